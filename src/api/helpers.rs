use poem::web::{Json, Query};
use uuid::Uuid;

use crate::errors::ApiError;

/// A path segment that must be a UUID; `resource` names it in the error
pub fn parse_uuid(raw: &str, resource: &str) -> Result<String, ApiError> {
    Uuid::parse_str(raw)
        .map(|uuid| uuid.to_string())
        .map_err(|_| ApiError::bad_request(format!("invalid {} UUID", resource)))
}

/// Unwrap a JSON body extraction; malformed bodies are the caller's fault
pub fn json_body<T>(body: poem::Result<Json<T>>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Unwrap a query string extraction so rejected strings still answer through the pipeline
pub fn query_params<T>(query: poem::Result<Query<T>>) -> Result<T, ApiError> {
    query.map(|Query(value)| value).map_err(|e| ApiError::bad_request(e.to_string()))
}
