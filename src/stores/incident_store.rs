use chrono::{DateTime, Utc};
use sea_orm::sea_query::Condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    QueryTrait, Select, Set,
};

use crate::errors::InternalError;
use crate::types::db::{
    host_machine, incident, incident_comment, incident_host, incident_resolution_team, team, team_user, user,
};
use crate::types::internal::PageParams;

/// Optional predicates for listing incidents; all present ones must hold
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentFilter {
    pub resolved: Option<bool>,
    pub hash: Option<String>,
    /// Restrict to incidents touching any team of this user id
    pub member_of_teams: Option<i32>,
}

impl IncidentFilter {
    fn apply(&self, mut select: Select<incident::Entity>) -> Select<incident::Entity> {
        match self.resolved {
            Some(true) => select = select.filter(incident::Column::ResolvedAt.is_not_null()),
            Some(false) => select = select.filter(incident::Column::ResolvedAt.is_null()),
            None => {}
        }

        if let Some(hash) = &self.hash {
            select = select.filter(incident::Column::Hash.eq(hash.as_str()));
        }

        if let Some(user_id) = self.member_of_teams {
            select = select.filter(my_teams_condition(user_id));
        }

        select
    }
}

/// Incident ids reachable from the user's teams through a resolution team
/// or through the owning team of an affected host
fn my_teams_condition(user_id: i32) -> Condition {
    let user_teams = || {
        team_user::Entity::find()
            .select_only()
            .column(team_user::Column::TeamId)
            .filter(team_user::Column::UserId.eq(user_id))
            .into_query()
    };

    let via_resolution_team = incident_resolution_team::Entity::find()
        .select_only()
        .column(incident_resolution_team::Column::IncidentId)
        .filter(incident_resolution_team::Column::TeamId.in_subquery(user_teams()))
        .into_query();

    let via_host_owner = incident_host::Entity::find()
        .select_only()
        .column(incident_host::Column::IncidentId)
        .inner_join(host_machine::Entity)
        .filter(host_machine::Column::TeamId.in_subquery(user_teams()))
        .into_query();

    Condition::any()
        .add(incident::Column::Id.in_subquery(via_resolution_team))
        .add(incident::Column::Id.in_subquery(via_host_owner))
}

#[derive(Debug, Default)]
pub struct IncidentStore;

impl IncidentStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        summary: &str,
        description: &str,
        hash: &str,
    ) -> Result<incident::Model, InternalError> {
        incident::ActiveModel {
            summary: Set(summary.to_string()),
            description: Set(description.to_string()),
            hash: Set(hash.to_string()),
            resolved_at: Set(None),
            resolved_by_id: Set(None),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_incident", e))
    }

    pub async fn find_by_uuid(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<Option<incident::Model>, InternalError> {
        incident::Entity::find()
            .filter(incident::Column::Uuid.eq(uuid))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_incident", e))
    }

    pub async fn find_by_hash(&self, conn: &impl ConnectionTrait, hash: &str) -> Result<Option<incident::Model>, InternalError> {
        incident::Entity::find()
            .filter(incident::Column::Hash.eq(hash))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_incident_by_hash", e))
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        filter: &IncidentFilter,
        params: PageParams,
    ) -> Result<(Vec<incident::Model>, u64), InternalError> {
        let select = filter
            .apply(incident::Entity::find())
            .order_by_asc(incident::Column::Id);
        super::fetch_page(conn, select, params, "list_incidents").await
    }

    /// Overwrite summary and description; `resolution` moves an open incident to resolved
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: incident::Model,
        summary: &str,
        description: &str,
        resolution: Option<(DateTime<Utc>, i32)>,
    ) -> Result<incident::Model, InternalError> {
        let mut active: incident::ActiveModel = existing.into();
        active.summary = Set(summary.to_string());
        active.description = Set(description.to_string());
        if let Some((resolved_at, resolved_by)) = resolution {
            active.resolved_at = Set(Some(resolved_at));
            active.resolved_by_id = Set(Some(resolved_by));
        }
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_incident", e))
    }

    /// Goes through the entity hook, which always refuses
    pub async fn delete(&self, conn: &impl ConnectionTrait, existing: incident::Model) -> Result<(), InternalError> {
        existing
            .delete(conn)
            .await
            .map_err(|e| InternalError::database("delete_incident", e))?;
        Ok(())
    }

    pub async fn replace_hosts(&self, conn: &impl ConnectionTrait, incident_id: i32, host_ids: &[i32]) -> Result<(), InternalError> {
        incident_host::Entity::delete_many()
            .filter(incident_host::Column::IncidentId.eq(incident_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_incident_hosts", e))?;

        if host_ids.is_empty() {
            return Ok(());
        }

        let rows = host_ids.iter().map(|host_id| incident_host::ActiveModel {
            incident_id: Set(incident_id),
            host_id: Set(*host_id),
        });
        incident_host::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("insert_incident_hosts", e))?;
        Ok(())
    }

    pub async fn replace_teams(&self, conn: &impl ConnectionTrait, incident_id: i32, team_ids: &[i32]) -> Result<(), InternalError> {
        incident_resolution_team::Entity::delete_many()
            .filter(incident_resolution_team::Column::IncidentId.eq(incident_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_incident_teams", e))?;

        if team_ids.is_empty() {
            return Ok(());
        }

        let rows = team_ids.iter().map(|team_id| incident_resolution_team::ActiveModel {
            incident_id: Set(incident_id),
            team_id: Set(*team_id),
        });
        incident_resolution_team::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("insert_incident_teams", e))?;
        Ok(())
    }

    /// Affected hosts paired with their owning team
    pub async fn hosts(
        &self,
        conn: &impl ConnectionTrait,
        incident: &incident::Model,
    ) -> Result<Vec<(host_machine::Model, team::Model)>, InternalError> {
        let rows = incident
            .find_related(host_machine::Entity)
            .order_by_asc(host_machine::Column::Id)
            .find_also_related(team::Entity)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("incident_hosts", e))?;

        Ok(rows.into_iter().filter_map(|(host, team)| team.map(|team| (host, team))).collect())
    }

    pub async fn teams(&self, conn: &impl ConnectionTrait, incident: &incident::Model) -> Result<Vec<team::Model>, InternalError> {
        incident
            .find_related(team::Entity)
            .order_by_asc(team::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("incident_teams", e))
    }

    /// Comments newest first, each with its author
    pub async fn comments(
        &self,
        conn: &impl ConnectionTrait,
        incident: &incident::Model,
    ) -> Result<Vec<(incident_comment::Model, user::Model)>, InternalError> {
        let rows = incident_comment::Entity::find()
            .filter(incident_comment::Column::IncidentId.eq(incident.id))
            .order_by_desc(incident_comment::Column::CommentedAt)
            .order_by_desc(incident_comment::Column::Id)
            .find_also_related(user::Entity)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("incident_comments", e))?;

        Ok(rows.into_iter().filter_map(|(comment, author)| author.map(|a| (comment, a))).collect())
    }

    pub async fn create_comment(
        &self,
        conn: &impl ConnectionTrait,
        incident_id: i32,
        author_id: i32,
        comment: &str,
    ) -> Result<incident_comment::Model, InternalError> {
        incident_comment::ActiveModel {
            incident_id: Set(incident_id),
            commented_by_id: Set(author_id),
            comment: Set(comment.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_comment", e))
    }

    pub async fn find_comment(
        &self,
        conn: &impl ConnectionTrait,
        incident_id: i32,
        uuid: &str,
    ) -> Result<Option<incident_comment::Model>, InternalError> {
        incident_comment::Entity::find()
            .filter(incident_comment::Column::IncidentId.eq(incident_id))
            .filter(incident_comment::Column::Uuid.eq(uuid))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_comment", e))
    }

    pub async fn delete_comment(&self, conn: &impl ConnectionTrait, comment: incident_comment::Model) -> Result<(), InternalError> {
        comment
            .delete(conn)
            .await
            .map_err(|e| InternalError::database("delete_comment", e))?;
        Ok(())
    }
}
