use async_trait::async_trait;
use sea_orm::entity::prelude::*;

use super::{current, ensure_max_len, ensure_not_empty};
use crate::errors::internal::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum FieldType {
    #[sea_orm(string_value = "string")]
    Text,
    #[sea_orm(string_value = "number")]
    Number,
    #[sea_orm(string_value = "boolean")]
    Boolean,
    #[sea_orm(string_value = "secret")]
    Secret,
}

impl FieldType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "string" => Some(Self::Text),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "secret" => Some(Self::Secret),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Secret => "secret",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "provider_fields")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub provider_id: i32,
    /// Order of the field within its provider
    pub position: i32,
    pub key: String,
    pub value: String,
    pub field_type: FieldType,
    pub required: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::provider::Entity",
        from = "Column::ProviderId",
        to = "super::provider::Column::Id",
        on_delete = "Cascade"
    )]
    Provider,
}

impl Related<super::provider::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Provider.def()
    }
}

impl ActiveModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(key) = current(&self.key) {
            ensure_not_empty("key", "provider field key", key)?;
            ensure_max_len("key", "provider field key", key, 50)?;
        }
        if let Some(value) = current(&self.value) {
            ensure_max_len("value", "provider field value", value, 200)?;
        }
        Ok(())
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self.validate().map_err(ValidationError::into_db_err)?;
        Ok(self)
    }
}
