use sea_orm::DbErr;
use thiserror::Error;

const DB_ERR_MARKER: &str = "validation";

/// A write-time invariant violation on a single field
///
/// Raised by entity hooks inside the request transaction. Hooks can only
/// return `DbErr`, so the error travels as `DbErr::Custom` and is decoded
/// again when the store error is classified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn into_db_err(self) -> DbErr {
        DbErr::Custom(format!("{}|{}|{}", DB_ERR_MARKER, self.field, self.message))
    }

    /// Recover a validation error that was raised by an entity hook
    pub fn from_db_err(err: &DbErr) -> Option<Self> {
        let DbErr::Custom(raw) = err else {
            return None;
        };
        let rest = raw.strip_prefix(DB_ERR_MARKER)?.strip_prefix('|')?;
        let (field, message) = rest.split_once('|')?;
        Some(Self::new(field, message))
    }
}
