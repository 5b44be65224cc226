use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::AppData;
use crate::errors::ApiError;
use crate::errors::internal::ValidationError;
use crate::providers::CryptoProvider;
use crate::stores::user_store::NewUser;
use crate::stores::{TeamStore, UserStore};
use crate::types::db::{ensure_max_len, ensure_not_empty, user};
use crate::types::dto::user::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::types::internal::{Page, PageParams, RequestContext};

const MAX_PASSWORD_LEN: usize = 72;

pub struct UserCoordinator {
    users: Arc<UserStore>,
    teams: Arc<TeamStore>,
    crypto: Arc<CryptoProvider>,
}

impl UserCoordinator {
    pub fn new(app_data: &AppData) -> Self {
        Self {
            users: Arc::clone(&app_data.user_store),
            teams: Arc::clone(&app_data.team_store),
            crypto: Arc::clone(&app_data.crypto_provider),
        }
    }

    pub async fn me(&self, ctx: &RequestContext, conn: &impl ConnectionTrait) -> Result<UserResponse, ApiError> {
        let user = super::acting_user(ctx)?.clone();
        self.respond(conn, user).await
    }

    pub async fn list(&self, conn: &impl ConnectionTrait, params: PageParams) -> Result<Page<UserResponse>, ApiError> {
        let (users, total) = self.users.list(conn, params).await?;

        let mut data = Vec::with_capacity(users.len());
        for user in users {
            data.push(self.respond(conn, user).await?);
        }
        Ok(Page { data, meta: params.meta(total) })
    }

    pub async fn get(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<UserResponse, ApiError> {
        let user = self.find(conn, uuid).await?;
        self.respond(conn, user).await
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        request: CreateUserRequest,
    ) -> Result<user::Model, ApiError> {
        validate_password(&request.password)?;
        let teams = self.resolve_membership(conn, &request.teams).await?;

        let password_hash = self.crypto.hash_password(&request.password).await?;
        let mut new_user = NewUser::new(&request.name, &request.email, &password_hash).admin(request.admin);
        new_user.slack_id = normalize(request.slack_id);

        let created = self.users.create(conn, new_user).await?;
        self.users.replace_teams(conn, created.id, &teams).await?;

        tracing::info!(request_id = %ctx.request_id, user_uuid = %created.uuid, "user created");
        Ok(created)
    }

    /// Replaces every column and the full team set; the password only when supplied
    pub async fn update(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        uuid: &str,
        request: UpdateUserRequest,
    ) -> Result<(), ApiError> {
        let existing = self.find(conn, uuid).await?;
        let teams = self.resolve_membership(conn, &request.teams).await?;

        let password_hash = match request.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(self.crypto.hash_password(password).await?)
            }
            None => None,
        };

        let mut changes = NewUser::new(&request.name, &request.email, &existing.password_hash).admin(request.admin);
        changes.slack_id = normalize(request.slack_id);

        let updated = self.users.update(conn, existing, changes, password_hash).await?;
        self.users.replace_teams(conn, updated.id, &teams).await?;

        tracing::info!(request_id = %ctx.request_id, user_uuid = %updated.uuid, "user updated");
        Ok(())
    }

    pub async fn delete(&self, ctx: &RequestContext, conn: &impl ConnectionTrait, uuid: &str) -> Result<(), ApiError> {
        let existing = self.find(conn, uuid).await?;
        if super::acting_user(ctx)?.id == existing.id {
            return Err(ApiError::bad_request("you cannot delete yourself"));
        }

        self.users.delete(conn, existing).await?;
        tracing::info!(request_id = %ctx.request_id, user_uuid = %uuid, "user deleted");
        Ok(())
    }

    async fn find(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<user::Model, ApiError> {
        self.users
            .find_by_uuid(conn, uuid)
            .await?
            .ok_or_else(|| ApiError::not_found("user not found"))
    }

    async fn resolve_membership(&self, conn: &impl ConnectionTrait, uuids: &[String]) -> Result<Vec<i32>, ApiError> {
        if uuids.is_empty() {
            return Err(ApiError::bad_request("user must be part of at least 1 team"));
        }
        let teams = super::resolve_teams(&self.teams, conn, uuids).await?;
        Ok(teams.iter().map(|team| team.id).collect())
    }

    async fn respond(&self, conn: &impl ConnectionTrait, user: user::Model) -> Result<UserResponse, ApiError> {
        let teams = self.users.teams(conn, &user).await?;
        Ok(UserResponse::new(user, teams))
    }
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    ensure_not_empty("password", "password", password)?;
    ensure_max_len("password", "password", password, MAX_PASSWORD_LEN)
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinators::test_support::{app, context_for};
    use crate::stores::test_support::memory_db;

    fn create_request(email: &str, teams: Vec<String>) -> CreateUserRequest {
        CreateUserRequest {
            name: "Grace".to_string(),
            email: email.to_string(),
            password: "s3cret-pass".to_string(),
            teams,
            slack_id: Some(String::new()),
            admin: false,
        }
    }

    #[tokio::test]
    async fn test_create_requires_a_team() {
        let app = app(memory_db().await);
        let coordinator = UserCoordinator::new(&app);
        let ctx = context_for(None);

        let err = coordinator
            .create(&ctx, &app.db, create_request("grace@example.com", vec![]))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::bad_request("user must be part of at least 1 team"));
    }

    #[tokio::test]
    async fn test_create_hashes_password_and_joins_teams() {
        let app = app(memory_db().await);
        let coordinator = UserCoordinator::new(&app);
        let ctx = context_for(None);
        let team = app.team_store.create(&app.db, "ops").await.unwrap();

        let created = coordinator
            .create(&ctx, &app.db, create_request("grace@example.com", vec![team.uuid.clone(), team.uuid.clone()]))
            .await
            .unwrap();

        assert_ne!(created.password_hash, "s3cret-pass");
        assert!(created.slack_id.is_none());

        let fetched = coordinator.get(&app.db, &created.uuid).await.unwrap();
        assert_eq!(fetched.teams.len(), 1);
        assert_eq!(fetched.teams[0].uuid, team.uuid);
    }

    #[tokio::test]
    async fn test_unknown_team_rejected() {
        let app = app(memory_db().await);
        let coordinator = UserCoordinator::new(&app);
        let ctx = context_for(None);

        let err = coordinator
            .create(&ctx, &app.db, create_request("grace@example.com", vec![uuid::Uuid::new_v4().to_string()]))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::bad_request("one or more teams not found"));
    }

    #[tokio::test]
    async fn test_password_too_long() {
        let app = app(memory_db().await);
        let coordinator = UserCoordinator::new(&app);
        let team = app.team_store.create(&app.db, "ops").await.unwrap();
        let mut request = create_request("grace@example.com", vec![team.uuid]);
        request.password = "x".repeat(73);

        let err = coordinator.create(&context_for(None), &app.db, request).await.unwrap_err();
        assert_eq!(err, ApiError::bad_request("password cannot be greater than 72 characters"));
    }

    #[tokio::test]
    async fn test_update_keeps_password_when_omitted() {
        let app = app(memory_db().await);
        let coordinator = UserCoordinator::new(&app);
        let ctx = context_for(None);
        let team = app.team_store.create(&app.db, "ops").await.unwrap();
        let created = coordinator
            .create(&ctx, &app.db, create_request("grace@example.com", vec![team.uuid.clone()]))
            .await
            .unwrap();

        coordinator
            .update(
                &ctx,
                &app.db,
                &created.uuid,
                UpdateUserRequest {
                    name: "Grace H".to_string(),
                    email: "grace@example.com".to_string(),
                    password: None,
                    teams: vec![team.uuid],
                    slack_id: Some("U123".to_string()),
                    admin: true,
                },
            )
            .await
            .unwrap();

        let stored = app.user_store.find_by_uuid(&app.db, &created.uuid).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, created.password_hash);
        assert_eq!(stored.name, "Grace H");
        assert!(stored.admin);
        assert_eq!(stored.slack_id.as_deref(), Some("U123"));
    }

    #[tokio::test]
    async fn test_cannot_delete_yourself() {
        let app = app(memory_db().await);
        let coordinator = UserCoordinator::new(&app);
        let team = app.team_store.create(&app.db, "ops").await.unwrap();
        let me = coordinator
            .create(&context_for(None), &app.db, create_request("grace@example.com", vec![team.uuid]))
            .await
            .unwrap();

        let ctx = context_for(Some(me.clone()));
        let err = coordinator.delete(&ctx, &app.db, &me.uuid).await.unwrap_err();
        assert_eq!(err, ApiError::bad_request("you cannot delete yourself"));
    }
}
