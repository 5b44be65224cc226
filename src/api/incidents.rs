use std::sync::Arc;

use poem::web::{Data, Json, Path, Query};
use poem::{Request, Response, handler};

use crate::AppData;
use crate::api::helpers::{json_body, parse_uuid, query_params};
use crate::coordinators::IncidentCoordinator;
use crate::pipeline::{Reply, RouteOptions};
use crate::types::dto::ListQuery;
use crate::types::dto::incident::{CommentRequest, CreateIncidentRequest, UpdateIncidentRequest};

/// GET /incidents?resolved=&myTeams=&hash=
#[handler]
pub async fn list(
    req: &Request,
    Data(app): Data<&Arc<AppData>>,
    query: poem::Result<Query<ListQuery>>,
) -> Response {
    let coordinator = IncidentCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::user(), |scope| async move {
            let query = query_params(query)?;
            let params = query.page_params()?;
            let resolved = query.resolved()?;
            let my_teams = query.my_teams()?;
            let page = coordinator
                .list(&scope.ctx, scope.txn()?, resolved, my_teams, query.hash(), params)
                .await?;
            Ok(Reply::new(page))
        })
        .await
}

#[handler]
pub async fn get(req: &Request, Data(app): Data<&Arc<AppData>>, Path(incident_id): Path<String>) -> Response {
    let coordinator = IncidentCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::user(), |scope| async move {
            let uuid = parse_uuid(&incident_id, "incident")?;
            Ok(Reply::new(coordinator.get(scope.txn()?, &uuid).await?))
        })
        .await
}

#[handler]
pub async fn create(
    req: &Request,
    Data(app): Data<&Arc<AppData>>,
    body: poem::Result<Json<CreateIncidentRequest>>,
) -> Response {
    let coordinator = IncidentCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::admin(), |scope| async move {
            let request = json_body(body)?;
            let created = coordinator.create(&scope.ctx, scope.txn()?, request).await?;
            Ok(Reply::empty().location(format!("/incidents/{}", created.uuid)))
        })
        .await
}

/// PUT /incidents/:incident_id; `resolved: true` resolves an open incident
#[handler]
pub async fn update(
    req: &Request,
    Data(app): Data<&Arc<AppData>>,
    Path(incident_id): Path<String>,
    body: poem::Result<Json<UpdateIncidentRequest>>,
) -> Response {
    let coordinator = IncidentCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::user(), |scope| async move {
            let uuid = parse_uuid(&incident_id, "incident")?;
            let request = json_body(body)?;
            coordinator.update(&scope.ctx, scope.txn()?, &uuid, request).await?;
            Ok(Reply::empty())
        })
        .await
}

/// DELETE /incidents/:incident_id always answers 400
#[handler]
pub async fn delete(req: &Request, Data(app): Data<&Arc<AppData>>, Path(incident_id): Path<String>) -> Response {
    let coordinator = IncidentCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::admin(), |scope| async move {
            let uuid = parse_uuid(&incident_id, "incident")?;
            coordinator.delete(scope.txn()?, &uuid).await?;
            Ok(Reply::empty())
        })
        .await
}

#[handler]
pub async fn add_comment(
    req: &Request,
    Data(app): Data<&Arc<AppData>>,
    Path(incident_id): Path<String>,
    body: poem::Result<Json<CommentRequest>>,
) -> Response {
    let coordinator = IncidentCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::user(), |scope| async move {
            let uuid = parse_uuid(&incident_id, "incident")?;
            let request = json_body(body)?;
            let comment = coordinator.add_comment(&scope.ctx, scope.txn()?, &uuid, request).await?;
            Ok(Reply::empty().location(format!("/incidents/{}/comments/{}", uuid, comment.uuid)))
        })
        .await
}

#[handler]
pub async fn delete_comment(
    req: &Request,
    Data(app): Data<&Arc<AppData>>,
    Path((incident_id, comment_id)): Path<(String, String)>,
) -> Response {
    let coordinator = IncidentCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::user(), |scope| async move {
            let incident_uuid = parse_uuid(&incident_id, "incident")?;
            let comment_uuid = parse_uuid(&comment_id, "comment")?;
            coordinator
                .delete_comment(&scope.ctx, scope.txn()?, &incident_uuid, &comment_uuid)
                .await?;
            Ok(Reply::empty())
        })
        .await
}
