use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::{team, user};
use crate::types::internal::PageParams;

#[derive(Debug, Default)]
pub struct TeamStore;

impl TeamStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(&self, conn: &impl ConnectionTrait, name: &str) -> Result<team::Model, InternalError> {
        team::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_team", e))
    }

    pub async fn find_by_uuid(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<Option<team::Model>, InternalError> {
        team::Entity::find()
            .filter(team::Column::Uuid.eq(uuid))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_team", e))
    }

    pub async fn find_by_name(&self, conn: &impl ConnectionTrait, name: &str) -> Result<Option<team::Model>, InternalError> {
        team::Entity::find()
            .filter(team::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_team_by_name", e))
    }

    /// Every team whose UUID is in `uuids`; callers compare lengths to detect unknown ids
    pub async fn find_by_uuids(&self, conn: &impl ConnectionTrait, uuids: &[String]) -> Result<Vec<team::Model>, InternalError> {
        if uuids.is_empty() {
            return Ok(Vec::new());
        }
        team::Entity::find()
            .filter(team::Column::Uuid.is_in(uuids.iter().cloned()))
            .order_by_asc(team::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_teams", e))
    }

    pub async fn list<C: ConnectionTrait>(&self, conn: &C, params: PageParams) -> Result<(Vec<team::Model>, u64), InternalError> {
        let select = team::Entity::find().order_by_asc(team::Column::Id);
        super::fetch_page(conn, select, params, "list_teams").await
    }

    pub async fn members(&self, conn: &impl ConnectionTrait, team: &team::Model) -> Result<Vec<user::Model>, InternalError> {
        team.find_related(user::Entity)
            .order_by_asc(user::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("team_members", e))
    }

    pub async fn rename(&self, conn: &impl ConnectionTrait, team: team::Model, name: &str) -> Result<team::Model, InternalError> {
        let mut active: team::ActiveModel = team.into();
        active.name = Set(name.to_string());
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_team", e))
    }

    /// Goes through the entity hook, which refuses while members remain
    pub async fn delete(&self, conn: &impl ConnectionTrait, team: team::Model) -> Result<(), InternalError> {
        let active: team::ActiveModel = team.into();
        active
            .delete(conn)
            .await
            .map_err(|e| InternalError::database("delete_team", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::DatabaseError;
    use crate::stores::test_support::memory_db;
    use crate::stores::user_store::{NewUser, UserStore};

    #[tokio::test]
    async fn test_create_mints_uuid_and_validates_name() {
        let db = memory_db().await;
        let store = TeamStore::new();

        let team = store.create(&db, "sre").await.unwrap();
        assert_eq!(team.uuid.len(), 36);

        match store.create(&db, &"x".repeat(31)).await {
            Err(InternalError::Validation(v)) => assert_eq!(v.message, "team name cannot be greater than 30 characters"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_name_is_unique_violation() {
        let db = memory_db().await;
        let store = TeamStore::new();
        store.create(&db, "sre").await.unwrap();

        match store.create(&db, "sre").await {
            Err(InternalError::Database(DatabaseError::UniqueViolation { constraint, .. })) => {
                assert_eq!(constraint, "teams.name")
            }
            other => panic!("expected unique violation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_blocked_while_members_remain() {
        let db = memory_db().await;
        let teams = TeamStore::new();
        let users = UserStore::new();
        let team = teams.create(&db, "sre").await.unwrap();
        let user = users
            .create(&db, NewUser::new("Ada", "ada@example.com", "hash"))
            .await
            .unwrap();
        users.replace_teams(&db, user.id, &[team.id]).await.unwrap();

        match teams.delete(&db, team.clone()).await {
            Err(InternalError::Validation(v)) => {
                assert_eq!(v.message, "teams cannot be deleted if there are still users in them")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(teams.find_by_uuid(&db, &team.uuid).await.unwrap().is_some());

        users.replace_teams(&db, user.id, &[]).await.unwrap();
        teams.delete(&db, team.clone()).await.unwrap();
        assert!(teams.find_by_uuid(&db, &team.uuid).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_uuids_skips_unknown() {
        let db = memory_db().await;
        let store = TeamStore::new();
        let a = store.create(&db, "a").await.unwrap();
        let found = store
            .find_by_uuids(&db, &[a.uuid.clone(), uuid::Uuid::new_v4().to_string()])
            .await
            .unwrap();
        assert_eq!(found, vec![a]);
    }
}
