use async_trait::async_trait;
use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use super::{current, ensure_max_len, ensure_not_empty, new_external_id};
use crate::errors::internal::ValidationError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "incidents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: String,
    pub summary: String,
    pub description: String,
    /// Dedup fingerprint; unique across all incidents
    #[sea_orm(unique)]
    pub hash: String,
    pub created_at: DateTimeUtc,
    pub resolved_at: Option<DateTimeUtc>,
    pub resolved_by_id: Option<i32>,
}

impl Model {
    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ResolvedById",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    ResolvedBy,
    #[sea_orm(has_many = "super::incident_comment::Entity")]
    IncidentComment,
    #[sea_orm(has_many = "super::incident_host::Entity")]
    IncidentHost,
    #[sea_orm(has_many = "super::incident_resolution_team::Entity")]
    IncidentResolutionTeam,
}

impl Related<super::incident_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncidentComment.def()
    }
}

impl Related<super::host_machine::Entity> for Entity {
    fn to() -> RelationDef {
        super::incident_host::Relation::HostMachine.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::incident_host::Relation::Incident.def().rev())
    }
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        super::incident_resolution_team::Relation::Team.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::incident_resolution_team::Relation::Incident.def().rev())
    }
}

impl ActiveModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(summary) = current(&self.summary) {
            ensure_not_empty("summary", "summary", summary)?;
            ensure_max_len("summary", "summary", summary, 100)?;
        }
        if let Some(description) = current(&self.description) {
            ensure_max_len("description", "description", description, 500)?;
        }
        if let Some(hash) = current(&self.hash) {
            ensure_not_empty("hash", "hash", hash)?;
            ensure_max_len("hash", "hash", hash, 64)?;
        }
        if let (Some(resolved_at), Some(resolved_by)) = (current(&self.resolved_at), current(&self.resolved_by_id)) {
            if resolved_at.is_some() != resolved_by.is_some() {
                return Err(ValidationError::new(
                    "resolved",
                    "resolvedAt and resolvedBy must be set together",
                ));
            }
        }
        Ok(())
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
            self.created_at = Set(Utc::now());
        } else if self.created_at.is_set() || self.uuid.is_set() || self.hash.is_set() {
            return Err(ValidationError::new("incident", "incident identity fields cannot be changed").into_db_err());
        }
        self.validate().map_err(ValidationError::into_db_err)?;
        Ok(self)
    }

    async fn before_delete<C>(self, _db: &C) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        Err(ValidationError::new("incident", "incidents cannot be deleted").into_db_err())
    }
}
