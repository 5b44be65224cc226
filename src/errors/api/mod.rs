use poem::http::StatusCode;
use thiserror::Error;

use crate::errors::internal::{CredentialError, DatabaseError, InternalError, JwtFailClass, ValidationError};

pub mod auth;

/// The single error type handlers and the pipeline return
///
/// Each variant carries the caller-facing message; the variant decides the
/// status code. Serialized by the pipeline as `{"error": "<message>"}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Generic 500; the cause is logged, never returned
    pub fn internal() -> Self {
        ApiError::Internal("internal server error".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m)
            | ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Internal(m) => m,
        }
    }

    /// Map an internal error onto the HTTP taxonomy
    pub fn from_internal(err: InternalError) -> Self {
        match err {
            InternalError::Validation(validation) => ApiError::BadRequest(validation.message),

            InternalError::Database(DatabaseError::UniqueViolation { constraint, .. }) => {
                ApiError::BadRequest(duplicate_message(&constraint).to_string())
            }

            InternalError::Database(DatabaseError::ForeignKeyViolation { operation, detail }) => {
                tracing::debug!(operation = %operation, detail = %detail, "foreign key violation");
                ApiError::bad_request("record is still referenced by other records")
            }

            InternalError::Credential(CredentialError::InvalidCredentials) => ApiError::invalid_credentials(),
            InternalError::Credential(CredentialError::UnknownUser) => ApiError::unknown_token_user(),

            InternalError::JwtValidation(jwt) => match jwt.class {
                JwtFailClass::Missing => ApiError::missing_token(),
                JwtFailClass::BadScheme => ApiError::bad_token_scheme(),
                JwtFailClass::Malformed => ApiError::unparseable_token(),
                JwtFailClass::Expired => ApiError::expired_token(),
                JwtFailClass::ClaimsRejected => ApiError::unparseable_claims(),
                JwtFailClass::Internal => {
                    tracing::error!(error = %jwt, "jwt validation infrastructure failure");
                    ApiError::internal()
                }
            },

            other => {
                tracing::error!(error = %other, "internal error");
                ApiError::internal()
            }
        }
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        ApiError::from_internal(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.message)
    }
}

/// Domain message for a unique-constraint violation on `table.column`
fn duplicate_message(constraint: &str) -> &'static str {
    match constraint {
        "users.email" => "a user with this email already exists",
        "teams.name" => "a team with this name already exists",
        "host_machines.hostname" => "a host with this hostname already exists",
        "providers.name" => "a provider with this name already exists",
        "incidents.hash" => "an incident with this hash already exists",
        _ => "a record with this value already exists",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{JwtValidationError, ValidationError};

    #[test]
    fn test_status_codes_follow_variant() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::internal().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_duplicate_hash_maps_to_bad_request() {
        let err = ApiError::from_internal(InternalError::Database(DatabaseError::UniqueViolation {
            operation: "insert_incident".to_string(),
            constraint: "incidents.hash".to_string(),
        }));
        assert_eq!(err, ApiError::bad_request("an incident with this hash already exists"));
    }

    #[test]
    fn test_validation_message_is_passed_through() {
        let err = ApiError::from_internal(ValidationError::new("name", "team name cannot be empty").into());
        assert_eq!(err.message(), "team name cannot be empty");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_expired_token_maps_to_unauthorized() {
        let jwt = JwtValidationError::from_jwt(jsonwebtoken::errors::ErrorKind::ExpiredSignature.into());
        let err = ApiError::from_internal(jwt.into());
        assert_eq!(err, ApiError::expired_token());
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_infrastructure_errors_do_not_leak_detail() {
        let err = ApiError::from_internal(InternalError::crypto("hash_password", "argon2 params rejected"));
        assert_eq!(err.message(), "internal server error");
    }
}
