use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::AppData;
use crate::errors::ApiError;
use crate::stores::host_store::NewHost;
use crate::stores::{HostStore, TeamStore};
use crate::types::db::host_machine::{self, OperatingSystem};
use crate::types::db::team;
use crate::types::dto::host::{HostRequest, HostResponse};
use crate::types::internal::{Page, PageParams, RequestContext};

pub struct HostCoordinator {
    hosts: Arc<HostStore>,
    teams: Arc<TeamStore>,
}

impl HostCoordinator {
    pub fn new(app_data: &AppData) -> Self {
        Self {
            hosts: Arc::clone(&app_data.host_store),
            teams: Arc::clone(&app_data.team_store),
        }
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        hostnames: &[String],
        params: PageParams,
    ) -> Result<Page<HostResponse>, ApiError> {
        let (hosts, total) = self.hosts.list(conn, hostnames, params).await?;
        Ok(Page {
            data: hosts.into_iter().map(|(host, team)| HostResponse::new(host, team)).collect(),
            meta: params.meta(total),
        })
    }

    pub async fn get(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<HostResponse, ApiError> {
        let (host, team) = self.find(conn, uuid).await?;
        Ok(HostResponse::new(host, team))
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        request: HostRequest,
    ) -> Result<host_machine::Model, ApiError> {
        let host = self.new_host(conn, request).await?;
        let created = self.hosts.create(conn, host).await?;
        tracing::info!(request_id = %ctx.request_id, host_uuid = %created.uuid, "host created");
        Ok(created)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        uuid: &str,
        request: HostRequest,
    ) -> Result<(), ApiError> {
        let (existing, _) = self.find(conn, uuid).await?;
        let host = self.new_host(conn, request).await?;
        self.hosts.update(conn, existing, host).await?;
        tracing::info!(request_id = %ctx.request_id, host_uuid = %uuid, "host updated");
        Ok(())
    }

    pub async fn delete(&self, ctx: &RequestContext, conn: &impl ConnectionTrait, uuid: &str) -> Result<(), ApiError> {
        let (existing, _) = self.find(conn, uuid).await?;
        self.hosts.delete(conn, existing).await?;
        tracing::info!(request_id = %ctx.request_id, host_uuid = %uuid, "host deleted");
        Ok(())
    }

    async fn find(
        &self,
        conn: &impl ConnectionTrait,
        uuid: &str,
    ) -> Result<(host_machine::Model, team::Model), ApiError> {
        self.hosts
            .find_by_uuid(conn, uuid)
            .await?
            .ok_or_else(|| ApiError::not_found("host not found"))
    }

    async fn new_host(&self, conn: &impl ConnectionTrait, request: HostRequest) -> Result<NewHost, ApiError> {
        let os = OperatingSystem::parse(&request.os)
            .ok_or_else(|| ApiError::bad_request("os must be one of Windows, Linux or MacOS"))?;

        let team = self
            .teams
            .find_by_uuid(conn, &super::canonical_uuid(&request.team_id, "team")?)
            .await?
            .ok_or_else(|| ApiError::bad_request("team not found"))?;

        Ok(NewHost {
            hostname: request.hostname,
            os,
            ip4: blank_to_none(request.ip4),
            ip6: blank_to_none(request.ip6),
            team_id: team.id,
        })
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinators::test_support::{app, context_for};
    use crate::stores::test_support::memory_db;

    fn request(team_id: &str) -> HostRequest {
        HostRequest {
            hostname: "web-1".to_string(),
            os: "Linux".to_string(),
            ip4: Some("10.0.0.7".to_string()),
            ip6: Some(String::new()),
            team_id: team_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_blank_ip() {
        let app = app(memory_db().await);
        let team = app.team_store.create(&app.db, "ops").await.unwrap();

        let created = HostCoordinator::new(&app)
            .create(&context_for(None), &app.db, request(&team.uuid))
            .await
            .unwrap();
        assert_eq!(created.ip4.as_deref(), Some("10.0.0.7"));
        assert!(created.ip6.is_none());
    }

    #[tokio::test]
    async fn test_unknown_team_is_bad_request() {
        let app = app(memory_db().await);
        let err = HostCoordinator::new(&app)
            .create(&context_for(None), &app.db, request(&uuid::Uuid::new_v4().to_string()))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::bad_request("team not found"));

        let err = HostCoordinator::new(&app)
            .create(&context_for(None), &app.db, request("missing"))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::bad_request("invalid team UUID"));
    }

    #[tokio::test]
    async fn test_unknown_os_is_bad_request() {
        let app = app(memory_db().await);
        let team = app.team_store.create(&app.db, "ops").await.unwrap();
        let mut request = request(&team.uuid);
        request.os = "BeOS".to_string();

        let err = HostCoordinator::new(&app)
            .create(&context_for(None), &app.db, request)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::bad_request("os must be one of Windows, Linux or MacOS"));
    }

    #[tokio::test]
    async fn test_host_without_any_ip_is_rejected() {
        let app = app(memory_db().await);
        let team = app.team_store.create(&app.db, "ops").await.unwrap();
        let mut request = request(&team.uuid);
        request.ip4 = None;

        let err = HostCoordinator::new(&app)
            .create(&context_for(None), &app.db, request)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::bad_request("host must have at least one of ip4 or ip6"));
    }
}
