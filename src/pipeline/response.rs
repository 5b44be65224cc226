use poem::http::StatusCode;
use poem::http::header::{CONTENT_TYPE, HeaderValue};
use poem::{Body, Response};
use serde::Serialize;

use crate::errors::ApiError;
use crate::types::dto::ErrorResponse;

use super::reply::Reply;

const JSON: &str = "application/json; charset=utf-8";

/// Serialize a reply; a body that cannot be encoded becomes a 500
pub(crate) fn reply_response<T: Serialize>(reply: Reply<T>, method: &str) -> Response {
    let status = reply.resolve_status(method);

    let mut builder = Response::builder().status(status);
    for (name, value) in &reply.headers {
        match HeaderValue::from_str(value) {
            Ok(value) => builder = builder.header(name.clone(), value),
            Err(e) => {
                tracing::error!(header = %name, error = %e, "unencodable response header");
                return error_response(&ApiError::internal());
            }
        }
    }

    match &reply.body {
        Some(body) => match serde_json::to_vec(body) {
            Ok(bytes) => builder.header(CONTENT_TYPE, JSON).body(Body::from(bytes)),
            Err(e) => {
                tracing::error!(error = %e, "response body serialization failed");
                error_response(&ApiError::internal())
            }
        },
        None => builder.body(Body::empty()),
    }
}

/// `{"error": "<message>"}` with the status of the error variant
pub(crate) fn error_response(err: &ApiError) -> Response {
    let body = ErrorResponse {
        error: err.message().to_string(),
    };
    let bytes = serde_json::to_vec(&body).unwrap_or_else(|_| b"{\"error\":\"internal server error\"}".to_vec());

    Response::builder()
        .status(err.status())
        .header(CONTENT_TYPE, JSON)
        .body(Body::from(bytes))
}

pub(crate) fn internal_status_code(err: &ApiError) -> bool {
    err.status() == StatusCode::INTERNAL_SERVER_ERROR
}
