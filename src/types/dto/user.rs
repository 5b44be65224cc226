use serde::{Deserialize, Serialize};

use crate::types::db::{team, user};

use super::team::TeamSummary;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(rename = "slackID")]
    pub slack_id: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

/// Full replacement; the password only changes when supplied
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(rename = "slackID")]
    pub slack_id: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub uuid: String,
    pub name: String,
    pub email: String,
    pub teams: Vec<TeamSummary>,
    #[serde(rename = "slackID")]
    pub slack_id: Option<String>,
    pub admin: bool,
}

impl UserResponse {
    pub fn new(user: user::Model, teams: Vec<team::Model>) -> Self {
        Self {
            uuid: user.uuid,
            name: user.name,
            email: user.email,
            teams: teams.into_iter().map(TeamSummary::from).collect(),
            slack_id: user.slack_id,
            admin: user.admin,
        }
    }
}

/// User as nested inside other resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub uuid: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "slackID")]
    pub slack_id: Option<String>,
    pub admin: bool,
}

impl From<user::Model> for UserSummary {
    fn from(user: user::Model) -> Self {
        Self {
            uuid: user.uuid,
            name: user.name,
            email: user.email,
            slack_id: user.slack_id,
            admin: user.admin,
        }
    }
}
