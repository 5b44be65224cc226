use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub mod credential;
pub mod database;
pub mod jwt_validation;
pub mod validation;

pub use credential::CredentialError;
pub use database::DatabaseError;
pub use jwt_validation::{JwtFailClass, JwtValidationError};
pub use validation::ValidationError;

/// Internal error type for store, provider and coordinator operations
///
/// Never serialized to callers directly; `ApiError::from_internal` decides
/// the status code and the message a caller is allowed to see.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    JwtValidation(#[from] JwtValidationError),
}

impl InternalError {
    /// Classify a store error raised while performing `operation`
    ///
    /// Hook validation failures and constraint violations are caller errors;
    /// everything else stays an opaque database failure.
    pub fn database(operation: &str, source: DbErr) -> InternalError {
        if let Some(validation) = ValidationError::from_db_err(&source) {
            return InternalError::Validation(validation);
        }

        match source.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                InternalError::Database(DatabaseError::UniqueViolation {
                    operation: operation.to_string(),
                    constraint: constraint_name(&detail),
                })
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                InternalError::Database(DatabaseError::ForeignKeyViolation {
                    operation: operation.to_string(),
                    detail,
                })
            }
            _ => InternalError::Database(DatabaseError::Operation {
                operation: operation.to_string(),
                source,
            }),
        }
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

/// Pull `table.column` out of a driver message such as
/// `UNIQUE constraint failed: users.email`.
fn constraint_name(detail: &str) -> String {
    let tail = detail.rsplit(':').next().unwrap_or(detail);
    tail.split(',')
        .next()
        .unwrap_or(tail)
        .trim()
        .trim_matches('"')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_name_from_sqlite_message() {
        assert_eq!(constraint_name("UNIQUE constraint failed: incidents.hash"), "incidents.hash");
    }

    #[test]
    fn test_constraint_name_uses_first_column_of_composite_key() {
        assert_eq!(
            constraint_name("UNIQUE constraint failed: team_users.team_id, team_users.user_id"),
            "team_users.team_id"
        );
    }

    #[test]
    fn test_hook_validation_is_classified_as_validation() {
        let err = InternalError::database(
            "insert_incident",
            ValidationError::new("summary", "summary cannot be empty").into_db_err(),
        );
        match err {
            InternalError::Validation(v) => assert_eq!(v.field, "summary"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_unclassified_db_error_stays_operation() {
        let err = InternalError::database("find_user", DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, InternalError::Database(DatabaseError::Operation { .. })));
    }
}
