use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{PaginatorTrait, QueryFilter};

use super::{current, ensure_max_len, ensure_not_empty, new_external_id};
use crate::errors::internal::ValidationError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: String,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::team_user::Entity")]
    TeamUser,
    #[sea_orm(has_many = "super::host_machine::Entity")]
    HostMachine,
    #[sea_orm(has_many = "super::incident_resolution_team::Entity")]
    IncidentResolutionTeam,
}

impl Related<super::team_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamUser.def()
    }
}

impl Related<super::host_machine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HostMachine.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::team_user::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::team_user::Relation::Team.def().rev())
    }
}

impl ActiveModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = current(&self.name) {
            ensure_not_empty("name", "team name", name)?;
            ensure_max_len("name", "team name", name, 30)?;
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
        }
        self.validate().map_err(ValidationError::into_db_err)?;
        Ok(self)
    }

    /// A team keeps its row while any user is still a member
    async fn before_delete<C>(self, db: &C) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let Some(id) = current(&self.id) {
            let members = super::team_user::Entity::find()
                .filter(super::team_user::Column::TeamId.eq(*id))
                .count(db)
                .await?;
            if members > 0 {
                return Err(ValidationError::new(
                    "team",
                    "teams cannot be deleted if there are still users in them",
                )
                .into_db_err());
            }
        }
        Ok(self)
    }
}
