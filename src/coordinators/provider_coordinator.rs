use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::AppData;
use crate::errors::ApiError;
use crate::stores::ProviderStore;
use crate::stores::provider_store::NewField;
use crate::types::db::provider::{self, ProviderType};
use crate::types::db::provider_field::FieldType;
use crate::types::dto::provider::{FieldRequest, ProviderRequest, ProviderResponse};
use crate::types::internal::{Page, PageParams, RequestContext};

pub struct ProviderCoordinator {
    providers: Arc<ProviderStore>,
}

impl ProviderCoordinator {
    pub fn new(app_data: &AppData) -> Self {
        Self {
            providers: Arc::clone(&app_data.provider_store),
        }
    }

    /// `provider_type` is mandatory on both listing and creation
    pub fn parse_type(raw: Option<&str>) -> Result<ProviderType, ApiError> {
        raw.and_then(ProviderType::parse).ok_or_else(|| {
            ApiError::bad_request("'provider_type' query parameter must be either 'log' or 'alert'")
        })
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        provider_type: ProviderType,
        params: PageParams,
    ) -> Result<Page<ProviderResponse>, ApiError> {
        let (providers, total) = self.providers.list(conn, provider_type, params).await?;

        let mut data = Vec::with_capacity(providers.len());
        for provider in providers {
            data.push(self.respond(conn, provider).await?);
        }
        Ok(Page { data, meta: params.meta(total) })
    }

    pub async fn get(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<ProviderResponse, ApiError> {
        let provider = self.find(conn, uuid).await?;
        self.respond(conn, provider).await
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        provider_type: ProviderType,
        request: ProviderRequest,
    ) -> Result<provider::Model, ApiError> {
        let fields = new_fields(request.fields)?;
        let created = self.providers.create(conn, &request.name, provider_type, &fields).await?;
        tracing::info!(
            request_id = %ctx.request_id,
            provider_uuid = %created.uuid,
            provider_type = provider_type.as_str(),
            "provider created"
        );
        Ok(created)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        uuid: &str,
        request: ProviderRequest,
    ) -> Result<(), ApiError> {
        let existing = self.find(conn, uuid).await?;
        let fields = new_fields(request.fields)?;
        self.providers.update(conn, existing, &request.name, &fields).await?;
        tracing::info!(request_id = %ctx.request_id, provider_uuid = %uuid, "provider updated");
        Ok(())
    }

    pub async fn delete(&self, ctx: &RequestContext, conn: &impl ConnectionTrait, uuid: &str) -> Result<(), ApiError> {
        let existing = self.find(conn, uuid).await?;
        self.providers.delete(conn, existing).await?;
        tracing::info!(request_id = %ctx.request_id, provider_uuid = %uuid, "provider deleted");
        Ok(())
    }

    async fn find(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<provider::Model, ApiError> {
        self.providers
            .find_by_uuid(conn, uuid)
            .await?
            .ok_or_else(|| ApiError::not_found("provider not found"))
    }

    async fn respond(&self, conn: &impl ConnectionTrait, provider: provider::Model) -> Result<ProviderResponse, ApiError> {
        let fields = self.providers.fields(conn, &provider).await?;
        Ok(ProviderResponse::new(provider, fields))
    }
}

fn new_fields(requests: Vec<FieldRequest>) -> Result<Vec<NewField>, ApiError> {
    requests
        .into_iter()
        .map(|field| {
            let field_type = FieldType::parse(&field.field_type).ok_or_else(|| {
                ApiError::bad_request("field type must be one of string, number, boolean or secret")
            })?;
            let required = field
                .required
                .ok_or_else(|| ApiError::bad_request(format!("field '{}' must specify required", field.key)))?;

            Ok(NewField {
                key: field.key,
                value: field.value,
                field_type,
                required,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinators::test_support::{app, context_for};
    use crate::stores::test_support::memory_db;

    fn field(key: &str, field_type: &str, required: Option<bool>) -> FieldRequest {
        FieldRequest {
            key: key.to_string(),
            value: String::new(),
            field_type: field_type.to_string(),
            required,
        }
    }

    #[test]
    fn test_parse_type() {
        assert_eq!(ProviderCoordinator::parse_type(Some("Alert")).unwrap(), ProviderType::Alert);
        for raw in [None, Some(""), Some("metrics")] {
            assert_eq!(
                ProviderCoordinator::parse_type(raw).unwrap_err(),
                ApiError::bad_request("'provider_type' query parameter must be either 'log' or 'alert'")
            );
        }
    }

    #[test]
    fn test_required_must_be_explicit() {
        let err = new_fields(vec![field("token", "secret", None)]).unwrap_err();
        assert_eq!(err, ApiError::bad_request("field 'token' must specify required"));
    }

    #[test]
    fn test_unknown_field_type() {
        assert!(new_fields(vec![field("token", "blob", Some(true))]).is_err());
    }

    #[tokio::test]
    async fn test_update_replaces_fields_in_order() {
        let app = app(memory_db().await);
        let coordinator = ProviderCoordinator::new(&app);
        let ctx = context_for(None);

        let created = coordinator
            .create(
                &ctx,
                &app.db,
                ProviderType::Log,
                ProviderRequest {
                    name: "loki".to_string(),
                    fields: vec![field("url", "string", Some(true))],
                },
            )
            .await
            .unwrap();

        coordinator
            .update(
                &ctx,
                &app.db,
                &created.uuid,
                ProviderRequest {
                    name: "loki-prod".to_string(),
                    fields: vec![field("token", "secret", Some(true)), field("retries", "number", Some(false))],
                },
            )
            .await
            .unwrap();

        let fetched = coordinator.get(&app.db, &created.uuid).await.unwrap();
        assert_eq!(fetched.name, "loki-prod");
        assert_eq!(fetched.provider_type, "log");
        let keys: Vec<_> = fetched.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["token", "retries"]);
    }
}
