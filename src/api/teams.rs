use std::sync::Arc;

use poem::web::{Data, Json, Path, Query};
use poem::{Request, Response, handler};

use crate::AppData;
use crate::api::helpers::{json_body, parse_uuid, query_params};
use crate::coordinators::TeamCoordinator;
use crate::pipeline::{Reply, RouteOptions};
use crate::types::dto::ListQuery;
use crate::types::dto::team::TeamRequest;

#[handler]
pub async fn list(
    req: &Request,
    Data(app): Data<&Arc<AppData>>,
    query: poem::Result<Query<ListQuery>>,
) -> Response {
    let coordinator = TeamCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::user(), |scope| async move {
            let query = query_params(query)?;
            let params = query.page_params()?;
            Ok(Reply::new(coordinator.list(scope.txn()?, params).await?))
        })
        .await
}

#[handler]
pub async fn get(req: &Request, Data(app): Data<&Arc<AppData>>, Path(team_id): Path<String>) -> Response {
    let coordinator = TeamCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::user(), |scope| async move {
            let uuid = parse_uuid(&team_id, "team")?;
            Ok(Reply::new(coordinator.get(scope.txn()?, &uuid).await?))
        })
        .await
}

#[handler]
pub async fn create(req: &Request, Data(app): Data<&Arc<AppData>>, body: poem::Result<Json<TeamRequest>>) -> Response {
    let coordinator = TeamCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::admin(), |scope| async move {
            let request = json_body(body)?;
            let created = coordinator.create(&scope.ctx, scope.txn()?, request).await?;
            Ok(Reply::empty().location(format!("/teams/{}", created.uuid)))
        })
        .await
}

#[handler]
pub async fn update(
    req: &Request,
    Data(app): Data<&Arc<AppData>>,
    Path(team_id): Path<String>,
    body: poem::Result<Json<TeamRequest>>,
) -> Response {
    let coordinator = TeamCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::admin(), |scope| async move {
            let uuid = parse_uuid(&team_id, "team")?;
            let request = json_body(body)?;
            coordinator.rename(&scope.ctx, scope.txn()?, &uuid, request).await?;
            Ok(Reply::empty())
        })
        .await
}

#[handler]
pub async fn delete(req: &Request, Data(app): Data<&Arc<AppData>>, Path(team_id): Path<String>) -> Response {
    let coordinator = TeamCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::admin(), |scope| async move {
            let uuid = parse_uuid(&team_id, "team")?;
            coordinator.delete(&scope.ctx, scope.txn()?, &uuid).await?;
            Ok(Reply::empty())
        })
        .await
}
