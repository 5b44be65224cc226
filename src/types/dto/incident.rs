use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::host::HostResponse;
use super::team::TeamResponse;
use super::user::UserSummary;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    pub summary: String,
    #[serde(default)]
    pub description: String,
    /// Derived from the summary when absent
    pub hash: Option<String>,
    #[serde(default)]
    pub hosts_affected: Vec<String>,
    #[serde(default)]
    pub resolution_teams: Vec<String>,
}

/// Full replacement of the mutable fields and both association sets
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncidentRequest {
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hosts_affected: Vec<String>,
    #[serde(default)]
    pub resolution_teams: Vec<String>,
    pub resolved: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub uuid: String,
    pub comment: String,
    pub commented_at: DateTime<Utc>,
    pub commented_by: UserSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentResponse {
    pub uuid: String,
    pub summary: String,
    pub description: String,
    pub hash: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<UserSummary>,
    pub hosts_affected: Vec<HostResponse>,
    pub resolution_teams: Vec<TeamResponse>,
    /// Newest first
    pub comments: Vec<CommentResponse>,
}
