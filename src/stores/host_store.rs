use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::host_machine::{self, OperatingSystem};
use crate::types::db::team;
use crate::types::internal::PageParams;

#[derive(Debug, Clone)]
pub struct NewHost {
    pub hostname: String,
    pub os: OperatingSystem,
    pub ip4: Option<String>,
    pub ip6: Option<String>,
    pub team_id: i32,
}

#[derive(Debug, Default)]
pub struct HostStore;

impl HostStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(&self, conn: &impl ConnectionTrait, host: NewHost) -> Result<host_machine::Model, InternalError> {
        host_machine::ActiveModel {
            hostname: Set(host.hostname),
            os: Set(host.os),
            ip4: Set(host.ip4),
            ip6: Set(host.ip6),
            team_id: Set(host.team_id),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_host", e))
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: host_machine::Model,
        host: NewHost,
    ) -> Result<host_machine::Model, InternalError> {
        let mut active: host_machine::ActiveModel = existing.into();
        active.hostname = Set(host.hostname);
        active.os = Set(host.os);
        active.ip4 = Set(host.ip4);
        active.ip6 = Set(host.ip6);
        active.team_id = Set(host.team_id);
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_host", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, host: host_machine::Model) -> Result<(), InternalError> {
        host.delete(conn)
            .await
            .map_err(|e| InternalError::database("delete_host", e))?;
        Ok(())
    }

    pub async fn find_by_uuid(
        &self,
        conn: &impl ConnectionTrait,
        uuid: &str,
    ) -> Result<Option<(host_machine::Model, team::Model)>, InternalError> {
        let found = host_machine::Entity::find()
            .filter(host_machine::Column::Uuid.eq(uuid))
            .find_also_related(team::Entity)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_host", e))?;

        Ok(found.and_then(|(host, team)| team.map(|team| (host, team))))
    }

    pub async fn find_by_uuids(&self, conn: &impl ConnectionTrait, uuids: &[String]) -> Result<Vec<host_machine::Model>, InternalError> {
        if uuids.is_empty() {
            return Ok(Vec::new());
        }
        host_machine::Entity::find()
            .filter(host_machine::Column::Uuid.is_in(uuids.iter().cloned()))
            .order_by_asc(host_machine::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_hosts", e))
    }

    /// Page of hosts with their owning team; `hostnames` is an exact-match OR filter
    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        hostnames: &[String],
        params: PageParams,
    ) -> Result<(Vec<(host_machine::Model, team::Model)>, u64), InternalError> {
        let mut select = host_machine::Entity::find();
        if !hostnames.is_empty() {
            select = select.filter(host_machine::Column::Hostname.is_in(hostnames.iter().cloned()));
        }
        let select = select
            .order_by_asc(host_machine::Column::Id)
            .find_also_related(team::Entity);

        let (rows, total) = super::fetch_page(conn, select, params, "list_hosts").await?;
        let hosts = rows
            .into_iter()
            .filter_map(|(host, team)| team.map(|team| (host, team)))
            .collect();

        Ok((hosts, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::DatabaseError;
    use crate::stores::test_support::memory_db;
    use crate::stores::TeamStore;

    fn new_host(hostname: &str, team_id: i32) -> NewHost {
        NewHost {
            hostname: hostname.to_string(),
            os: OperatingSystem::Linux,
            ip4: Some("10.0.0.1".to_string()),
            ip6: None,
            team_id,
        }
    }

    #[tokio::test]
    async fn test_hostname_filter_is_exact_or() {
        let db = memory_db().await;
        let team = TeamStore::new().create(&db, "sre").await.unwrap();
        let store = HostStore::new();
        for name in ["web-01", "web-02", "db-01"] {
            store.create(&db, new_host(name, team.id)).await.unwrap();
        }

        let filter = vec!["web-01".to_string(), "db-01".to_string(), "web".to_string()];
        let (hosts, total) = store.list(&db, &filter, PageParams::default()).await.unwrap();
        assert_eq!(total, 2);
        let names: Vec<_> = hosts.iter().map(|(h, _)| h.hostname.as_str()).collect();
        assert_eq!(names, vec!["web-01", "db-01"]);
        assert!(hosts.iter().all(|(_, t)| t.id == team.id));
    }

    #[tokio::test]
    async fn test_host_needs_an_address() {
        let db = memory_db().await;
        let team = TeamStore::new().create(&db, "sre").await.unwrap();
        let mut host = new_host("web-01", team.id);
        host.ip4 = None;

        match HostStore::new().create(&db, host).await {
            Err(InternalError::Validation(v)) => assert_eq!(v.message, "host must have at least one of ip4 or ip6"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_hostname() {
        let db = memory_db().await;
        let team = TeamStore::new().create(&db, "sre").await.unwrap();
        let store = HostStore::new();
        store.create(&db, new_host("web-01", team.id)).await.unwrap();

        match store.create(&db, new_host("web-01", team.id)).await {
            Err(InternalError::Database(DatabaseError::UniqueViolation { constraint, .. })) => {
                assert_eq!(constraint, "host_machines.hostname")
            }
            other => panic!("expected unique violation, got {:?}", other),
        }
    }
}
