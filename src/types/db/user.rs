use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use super::{current, ensure_max_len, ensure_not_empty, new_external_id};
use crate::errors::internal::ValidationError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
});

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub admin: bool,
    pub slack_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::team_user::Entity")]
    TeamUser,
}

impl Related<super::team_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamUser.def()
    }
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        super::team_user::Relation::Team.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::team_user::Relation::User.def().rev())
    }
}

impl ActiveModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = current(&self.name) {
            ensure_not_empty("name", "user name", name)?;
            ensure_max_len("name", "user name", name, 30)?;
        }
        if let Some(email) = current(&self.email) {
            ensure_max_len("email", "user email", email, 30)?;
            if !EMAIL_PATTERN.is_match(email) {
                return Err(ValidationError::new("email", "user email is not a valid email"));
            }
        }
        if let Some(Some(slack_id)) = current(&self.slack_id) {
            ensure_max_len("slackID", "user slack id", slack_id, 30)?;
        }
        Ok(())
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            self.uuid = Set(new_external_id());
            self.created_at = Set(Utc::now());
        }
        self.validate().map_err(ValidationError::into_db_err)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ActiveModel {
        ActiveModel {
            name: Set("Ada".to_string()),
            email: Set("ada@example.com".to_string()),
            password_hash: Set("$argon2id$stub".to_string()),
            admin: Set(false),
            slack_id: Set(None),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_user_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_email_format_is_checked() {
        let mut user = valid();
        user.email = Set("not-an-email".to_string());
        assert_eq!(user.validate().unwrap_err().message, "user email is not a valid email");
    }

    #[test]
    fn test_email_length_ceiling() {
        let mut user = valid();
        user.email = Set(format!("{}@example.com", "a".repeat(25)));
        assert_eq!(user.validate().unwrap_err().field, "email");
    }

    #[test]
    fn test_name_length_ceiling() {
        let mut user = valid();
        user.name = Set("n".repeat(31));
        assert_eq!(user.validate().unwrap_err().message, "user name cannot be greater than 30 characters");
    }
}
