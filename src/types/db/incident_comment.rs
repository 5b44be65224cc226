use async_trait::async_trait;
use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use super::{current, ensure_max_len, ensure_not_empty, new_external_id};
use crate::errors::internal::ValidationError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "incident_comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: String,
    pub incident_id: i32,
    pub commented_by_id: i32,
    pub comment: String,
    pub commented_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::incident::Entity",
        from = "Column::IncidentId",
        to = "super::incident::Column::Id",
        on_delete = "Cascade"
    )]
    Incident,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CommentedById",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    CommentedBy,
}

impl Related<super::incident::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incident.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommentedBy.def()
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
            self.commented_at = Set(Utc::now());
        }
        if let Some(comment) = current(&self.comment) {
            ensure_not_empty("comment", "comment", comment).map_err(ValidationError::into_db_err)?;
            ensure_max_len("comment", "comment", comment, 200).map_err(ValidationError::into_db_err)?;
        }
        Ok(self)
    }
}
