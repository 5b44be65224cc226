use std::net::{Ipv4Addr, Ipv6Addr};

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use super::{current, ensure_max_len, ensure_not_empty, new_external_id};
use crate::errors::internal::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum OperatingSystem {
    #[sea_orm(string_value = "Windows")]
    Windows,
    #[sea_orm(string_value = "Linux")]
    Linux,
    #[sea_orm(string_value = "MacOS")]
    MacOS,
}

impl OperatingSystem {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Windows" => Some(Self::Windows),
            "Linux" => Some(Self::Linux),
            "MacOS" => Some(Self::MacOS),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::MacOS => "MacOS",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "host_machines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: String,
    #[sea_orm(unique)]
    pub hostname: String,
    pub os: OperatingSystem,
    pub ip4: Option<String>,
    pub ip6: Option<String>,
    pub team_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id",
        on_delete = "Restrict"
    )]
    Team,
    #[sea_orm(has_many = "super::incident_host::Entity")]
    IncidentHost,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::incident_host::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncidentHost.def()
    }
}

impl ActiveModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(hostname) = current(&self.hostname) {
            ensure_not_empty("hostname", "hostname", hostname)?;
            ensure_max_len("hostname", "hostname", hostname, 255)?;
        }
        if let Some(Some(ip4)) = current(&self.ip4) {
            ensure_max_len("ip4", "ip4", ip4, 15)?;
            if ip4.parse::<Ipv4Addr>().is_err() {
                return Err(ValidationError::new("ip4", "ip4 is not a valid IPv4 address"));
            }
        }
        if let Some(Some(ip6)) = current(&self.ip6) {
            ensure_max_len("ip6", "ip6", ip6, 39)?;
            if ip6.parse::<Ipv6Addr>().is_err() {
                return Err(ValidationError::new("ip6", "ip6 is not a valid IPv6 address"));
            }
        }
        if let (Some(None), Some(None)) = (current(&self.ip4), current(&self.ip6)) {
            return Err(ValidationError::new("ip4", "host must have at least one of ip4 or ip6"));
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
}
