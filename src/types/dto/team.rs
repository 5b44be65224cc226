use serde::{Deserialize, Serialize};

use crate::types::db::{team, user};

use super::user::UserSummary;

#[derive(Debug, Clone, Deserialize)]
pub struct TeamRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub uuid: String,
    pub name: String,
}

impl From<team::Model> for TeamSummary {
    fn from(team: team::Model) -> Self {
        Self {
            uuid: team.uuid,
            name: team.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResponse {
    pub uuid: String,
    pub name: String,
    pub users: Vec<UserSummary>,
}

impl TeamResponse {
    pub fn new(team: team::Model, users: Vec<user::Model>) -> Self {
        Self {
            uuid: team.uuid,
            name: team.name,
            users: users.into_iter().map(UserSummary::from).collect(),
        }
    }
}
