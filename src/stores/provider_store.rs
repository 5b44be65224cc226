use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::provider::{self, ProviderType};
use crate::types::db::provider_field::{self, FieldType};
use crate::types::internal::PageParams;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewField {
    pub key: String,
    pub value: String,
    pub field_type: FieldType,
    pub required: bool,
}

#[derive(Debug, Default)]
pub struct ProviderStore;

impl ProviderStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
        provider_type: ProviderType,
        fields: &[NewField],
    ) -> Result<provider::Model, InternalError> {
        let created = provider::ActiveModel {
            name: Set(name.to_string()),
            provider_type: Set(provider_type),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_provider", e))?;

        self.insert_fields(conn, created.id, fields).await?;
        Ok(created)
    }

    pub async fn find_by_uuid(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<Option<provider::Model>, InternalError> {
        provider::Entity::find()
            .filter(provider::Column::Uuid.eq(uuid))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_provider", e))
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        provider_type: ProviderType,
        params: PageParams,
    ) -> Result<(Vec<provider::Model>, u64), InternalError> {
        let select = provider::Entity::find()
            .filter(provider::Column::ProviderType.eq(provider_type))
            .order_by_asc(provider::Column::Id);
        super::fetch_page(conn, select, params, "list_providers").await
    }

    /// Fields in the order they were submitted
    pub async fn fields(&self, conn: &impl ConnectionTrait, provider: &provider::Model) -> Result<Vec<provider_field::Model>, InternalError> {
        provider
            .find_related(provider_field::Entity)
            .order_by_asc(provider_field::Column::Position)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("provider_fields", e))
    }

    /// Rename and replace every field; there is no partial field update
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: provider::Model,
        name: &str,
        fields: &[NewField],
    ) -> Result<provider::Model, InternalError> {
        let provider_id = existing.id;
        let mut active: provider::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        let updated = active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_provider", e))?;

        self.delete_fields(conn, provider_id).await?;
        self.insert_fields(conn, provider_id, fields).await?;
        Ok(updated)
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, provider: provider::Model) -> Result<(), InternalError> {
        self.delete_fields(conn, provider.id).await?;
        provider
            .delete(conn)
            .await
            .map_err(|e| InternalError::database("delete_provider", e))?;
        Ok(())
    }

    async fn delete_fields(&self, conn: &impl ConnectionTrait, provider_id: i32) -> Result<(), InternalError> {
        provider_field::Entity::delete_many()
            .filter(provider_field::Column::ProviderId.eq(provider_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_provider_fields", e))?;
        Ok(())
    }

    // one insert per row so the entity hook validates each field
    async fn insert_fields(&self, conn: &impl ConnectionTrait, provider_id: i32, fields: &[NewField]) -> Result<(), InternalError> {
        for (position, field) in fields.iter().enumerate() {
            provider_field::ActiveModel {
                provider_id: Set(provider_id),
                position: Set(position as i32),
                key: Set(field.key.clone()),
                value: Set(field.value.clone()),
                field_type: Set(field.field_type),
                required: Set(field.required),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_provider_field", e))?;
        }
        Ok(())
    }
}
