use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::AppData;
use crate::errors::ApiError;
use crate::stores::TeamStore;
use crate::types::db::team;
use crate::types::dto::team::{TeamRequest, TeamResponse};
use crate::types::internal::{Page, PageParams, RequestContext};

pub struct TeamCoordinator {
    teams: Arc<TeamStore>,
}

impl TeamCoordinator {
    pub fn new(app_data: &AppData) -> Self {
        Self {
            teams: Arc::clone(&app_data.team_store),
        }
    }

    pub async fn list(&self, conn: &impl ConnectionTrait, params: PageParams) -> Result<Page<TeamResponse>, ApiError> {
        let (teams, total) = self.teams.list(conn, params).await?;

        let mut data = Vec::with_capacity(teams.len());
        for team in teams {
            data.push(self.respond(conn, team).await?);
        }
        Ok(Page { data, meta: params.meta(total) })
    }

    pub async fn get(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<TeamResponse, ApiError> {
        let team = self.find(conn, uuid).await?;
        self.respond(conn, team).await
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        request: TeamRequest,
    ) -> Result<team::Model, ApiError> {
        let created = self.teams.create(conn, &request.name).await?;
        tracing::info!(request_id = %ctx.request_id, team_uuid = %created.uuid, "team created");
        Ok(created)
    }

    pub async fn rename(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        uuid: &str,
        request: TeamRequest,
    ) -> Result<(), ApiError> {
        let existing = self.find(conn, uuid).await?;
        self.teams.rename(conn, existing, &request.name).await?;
        tracing::info!(request_id = %ctx.request_id, team_uuid = %uuid, "team renamed");
        Ok(())
    }

    /// Refused by the entity hook while the team still has members
    pub async fn delete(&self, ctx: &RequestContext, conn: &impl ConnectionTrait, uuid: &str) -> Result<(), ApiError> {
        let existing = self.find(conn, uuid).await?;
        self.teams.delete(conn, existing).await?;
        tracing::info!(request_id = %ctx.request_id, team_uuid = %uuid, "team deleted");
        Ok(())
    }

    async fn find(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<team::Model, ApiError> {
        self.teams
            .find_by_uuid(conn, uuid)
            .await?
            .ok_or_else(|| ApiError::not_found("team not found"))
    }

    async fn respond(&self, conn: &impl ConnectionTrait, team: team::Model) -> Result<TeamResponse, ApiError> {
        let users = self.teams.members(conn, &team).await?;
        Ok(TeamResponse::new(team, users))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinators::test_support::{app, context_for};
    use crate::stores::test_support::memory_db;
    use crate::stores::user_store::NewUser;

    #[tokio::test]
    async fn test_duplicate_name_is_bad_request() {
        let app = app(memory_db().await);
        let coordinator = TeamCoordinator::new(&app);
        let ctx = context_for(None);
        let request = || TeamRequest { name: "ops".to_string() };

        coordinator.create(&ctx, &app.db, request()).await.unwrap();
        let err = coordinator.create(&ctx, &app.db, request()).await.unwrap_err();
        assert_eq!(err, ApiError::bad_request("a team with this name already exists"));
    }

    #[tokio::test]
    async fn test_delete_with_members_is_refused() {
        let app = app(memory_db().await);
        let coordinator = TeamCoordinator::new(&app);
        let ctx = context_for(None);
        let team = coordinator
            .create(&ctx, &app.db, TeamRequest { name: "ops".to_string() })
            .await
            .unwrap();
        let user = app
            .user_store
            .create(&app.db, NewUser::new("Ada", "ada@example.com", "unused"))
            .await
            .unwrap();
        app.user_store.replace_teams(&app.db, user.id, &[team.id]).await.unwrap();

        let err = coordinator.delete(&ctx, &app.db, &team.uuid).await.unwrap_err();
        assert_eq!(err, ApiError::bad_request("teams cannot be deleted if there are still users in them"));

        let still_there = coordinator.get(&app.db, &team.uuid).await.unwrap();
        assert_eq!(still_there.users.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_team_is_not_found() {
        let app = app(memory_db().await);
        let err = TeamCoordinator::new(&app)
            .rename(&context_for(None), &app.db, "missing", TeamRequest { name: "x".to_string() })
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::not_found("team not found"));
    }
}
