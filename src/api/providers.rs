use std::sync::Arc;

use poem::web::{Data, Json, Path, Query};
use poem::{Request, Response, handler};

use crate::AppData;
use crate::api::helpers::{json_body, parse_uuid, query_params};
use crate::coordinators::ProviderCoordinator;
use crate::pipeline::{Reply, RouteOptions};
use crate::types::dto::ListQuery;
use crate::types::dto::provider::ProviderRequest;

/// GET /providers?provider_type=log|alert
#[handler]
pub async fn list(
    req: &Request,
    Data(app): Data<&Arc<AppData>>,
    query: poem::Result<Query<ListQuery>>,
) -> Response {
    let coordinator = ProviderCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::admin(), |scope| async move {
            let query = query_params(query)?;
            let provider_type = ProviderCoordinator::parse_type(query.provider_type.as_deref())?;
            let params = query.page_params()?;
            Ok(Reply::new(coordinator.list(scope.txn()?, provider_type, params).await?))
        })
        .await
}

#[handler]
pub async fn get(req: &Request, Data(app): Data<&Arc<AppData>>, Path(provider_id): Path<String>) -> Response {
    let coordinator = ProviderCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::admin(), |scope| async move {
            let uuid = parse_uuid(&provider_id, "provider")?;
            Ok(Reply::new(coordinator.get(scope.txn()?, &uuid).await?))
        })
        .await
}

/// POST /providers?provider_type=log|alert
#[handler]
pub async fn create(
    req: &Request,
    Data(app): Data<&Arc<AppData>>,
    query: poem::Result<Query<ListQuery>>,
    body: poem::Result<Json<ProviderRequest>>,
) -> Response {
    let coordinator = ProviderCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::admin(), |scope| async move {
            let query = query_params(query)?;
            let provider_type = ProviderCoordinator::parse_type(query.provider_type.as_deref())?;
            let request = json_body(body)?;
            let created = coordinator.create(&scope.ctx, scope.txn()?, provider_type, request).await?;
            Ok(Reply::empty().location(format!("/providers/{}", created.uuid)))
        })
        .await
}

#[handler]
pub async fn update(
    req: &Request,
    Data(app): Data<&Arc<AppData>>,
    Path(provider_id): Path<String>,
    body: poem::Result<Json<ProviderRequest>>,
) -> Response {
    let coordinator = ProviderCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::admin(), |scope| async move {
            let uuid = parse_uuid(&provider_id, "provider")?;
            let request = json_body(body)?;
            coordinator.update(&scope.ctx, scope.txn()?, &uuid, request).await?;
            Ok(Reply::empty())
        })
        .await
}

#[handler]
pub async fn delete(req: &Request, Data(app): Data<&Arc<AppData>>, Path(provider_id): Path<String>) -> Response {
    let coordinator = ProviderCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::admin(), |scope| async move {
            let uuid = parse_uuid(&provider_id, "provider")?;
            coordinator.delete(&scope.ctx, scope.txn()?, &uuid).await?;
            Ok(Reply::empty())
        })
        .await
}
