use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use super::{current, ensure_max_len, ensure_not_empty, new_external_id};
use crate::errors::internal::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ProviderType {
    #[sea_orm(string_value = "log")]
    Log,
    #[sea_orm(string_value = "alert")]
    Alert,
}

impl ProviderType {
    /// Query values are matched case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "log" => Some(Self::Log),
            "alert" => Some(Self::Alert),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Alert => "alert",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "providers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: String,
    #[sea_orm(unique)]
    pub name: String,
    pub provider_type: ProviderType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::provider_field::Entity")]
    ProviderField,
}

impl Related<super::provider_field::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProviderField.def()
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
        }
        if let Some(name) = current(&self.name) {
            ensure_not_empty("name", "provider name", name).map_err(ValidationError::into_db_err)?;
            ensure_max_len("name", "provider name", name, 30).map_err(ValidationError::into_db_err)?;
        }
        Ok(self)
    }
}
