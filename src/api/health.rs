use std::sync::Arc;

use chrono::Utc;
use poem::web::Data;
use poem::{Request, Response, handler};

use crate::AppData;
use crate::pipeline::{Reply, RouteOptions};
use crate::types::dto::HealthResponse;

/// Liveness probe; touches neither the database nor the gate
#[handler]
pub async fn health(req: &Request, Data(app): Data<&Arc<AppData>>) -> Response {
    app.pipeline()
        .run(req, RouteOptions::bare(), |_scope| async move {
            Ok(Reply::new(HealthResponse {
                status: "healthy".to_string(),
                timestamp: Utc::now().to_rfc3339(),
            }))
        })
        .await
}
