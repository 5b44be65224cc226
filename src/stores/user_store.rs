use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::{team, team_user, user};
use crate::types::internal::PageParams;

/// Columns written when a user is created or replaced
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub admin: bool,
    pub slack_id: Option<String>,
}

impl NewUser {
    pub fn new(name: &str, email: &str, password_hash: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            admin: false,
            slack_id: None,
        }
    }

    pub fn admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }
}

#[derive(Debug, Default)]
pub struct UserStore;

impl UserStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(&self, conn: &impl ConnectionTrait, new_user: NewUser) -> Result<user::Model, InternalError> {
        user::ActiveModel {
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            admin: Set(new_user.admin),
            slack_id: Set(new_user.slack_id),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_user", e))
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, id: i32) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user", e))
    }

    pub async fn find_by_uuid(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Uuid.eq(uuid))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user", e))
    }

    pub async fn find_by_email(&self, conn: &impl ConnectionTrait, email: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    pub async fn list(&self, conn: &impl ConnectionTrait, params: PageParams) -> Result<(Vec<user::Model>, u64), InternalError> {
        let select = user::Entity::find().order_by_asc(user::Column::Id);
        super::fetch_page(conn, select, params, "list_users").await
    }

    pub async fn teams(&self, conn: &impl ConnectionTrait, user: &user::Model) -> Result<Vec<team::Model>, InternalError> {
        user.find_related(team::Entity)
            .order_by_asc(team::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("user_teams", e))
    }

    /// Overwrite the stored columns; `password_hash` is kept when `None`
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: user::Model,
        changes: NewUser,
        password_hash: Option<String>,
    ) -> Result<user::Model, InternalError> {
        let mut active: user::ActiveModel = existing.into();
        active.name = Set(changes.name);
        active.email = Set(changes.email);
        active.admin = Set(changes.admin);
        active.slack_id = Set(changes.slack_id);
        if let Some(hash) = password_hash {
            active.password_hash = Set(hash);
        }
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_user", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, user: user::Model) -> Result<(), InternalError> {
        user.delete(conn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;
        Ok(())
    }

    /// Delete every membership row of `user_id` then insert one per team
    pub async fn replace_teams(&self, conn: &impl ConnectionTrait, user_id: i32, team_ids: &[i32]) -> Result<(), InternalError> {
        team_user::Entity::delete_many()
            .filter(team_user::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_user_teams", e))?;

        if team_ids.is_empty() {
            return Ok(());
        }

        let rows = team_ids.iter().map(|team_id| team_user::ActiveModel {
            team_id: Set(*team_id),
            user_id: Set(user_id),
        });
        team_user::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("insert_user_teams", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::DatabaseError;
    use crate::stores::test_support::memory_db;
    use crate::stores::TeamStore;

    #[tokio::test]
    async fn test_create_and_find() {
        let db = memory_db().await;
        let store = UserStore::new();

        let created = store
            .create(&db, NewUser::new("Ada", "ada@example.com", "hash").admin(true))
            .await
            .unwrap();
        assert!(created.admin);

        let by_email = store.find_by_email(&db, "ada@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.uuid, created.uuid);
        assert!(store.find_by_uuid(&db, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_email_rejected_by_hook() {
        let db = memory_db().await;
        match UserStore::new().create(&db, NewUser::new("Ada", "not-an-email", "hash")).await {
            Err(InternalError::Validation(v)) => assert_eq!(v.message, "user email is not a valid email"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let db = memory_db().await;
        let store = UserStore::new();
        store.create(&db, NewUser::new("Ada", "ada@example.com", "hash")).await.unwrap();

        match store.create(&db, NewUser::new("Ada 2", "ada@example.com", "hash")).await {
            Err(InternalError::Database(DatabaseError::UniqueViolation { constraint, .. })) => {
                assert_eq!(constraint, "users.email")
            }
            other => panic!("expected unique violation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_replace_teams_overwrites_membership() {
        let db = memory_db().await;
        let users = UserStore::new();
        let teams = TeamStore::new();
        let a = teams.create(&db, "a").await.unwrap();
        let b = teams.create(&db, "b").await.unwrap();
        let user = users.create(&db, NewUser::new("Ada", "ada@example.com", "hash")).await.unwrap();

        users.replace_teams(&db, user.id, &[a.id, b.id]).await.unwrap();
        assert_eq!(users.teams(&db, &user).await.unwrap().len(), 2);

        users.replace_teams(&db, user.id, &[b.id]).await.unwrap();
        assert_eq!(users.teams(&db, &user).await.unwrap(), vec![b]);
    }

    #[tokio::test]
    async fn test_update_keeps_password_when_not_supplied() {
        let db = memory_db().await;
        let store = UserStore::new();
        let user = store.create(&db, NewUser::new("Ada", "ada@example.com", "original")).await.unwrap();

        let updated = store
            .update(&db, user, NewUser::new("Ada L", "ada@example.com", "ignored"), None)
            .await
            .unwrap();
        assert_eq!(updated.name, "Ada L");
        assert_eq!(updated.password_hash, "original");
    }
}
