// Database entities - SeaORM models
pub mod host_machine;
pub mod incident;
pub mod incident_comment;
pub mod incident_host;
pub mod incident_resolution_team;
pub mod provider;
pub mod provider_field;
pub mod team;
pub mod team_user;
pub mod user;

use sea_orm::{ActiveValue, Value};

use crate::errors::internal::ValidationError;

/// The value a hook should validate: set by the caller or loaded unchanged
pub(crate) fn current<V>(value: &ActiveValue<V>) -> Option<&V>
where
    V: Into<Value>,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v),
        ActiveValue::NotSet => None,
    }
}

pub(crate) fn ensure_not_empty(field: &str, label: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, format!("{} cannot be empty", label)));
    }
    Ok(())
}

pub(crate) fn ensure_max_len(field: &str, label: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("{} cannot be greater than {} characters", label, max),
        ));
    }
    Ok(())
}

pub(crate) fn new_external_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
