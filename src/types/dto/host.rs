use serde::{Deserialize, Serialize};

use crate::types::db::{host_machine, team};

use super::team::TeamSummary;

/// Body of both create and update; empty IP strings mean "no address"
#[derive(Debug, Clone, Deserialize)]
pub struct HostRequest {
    pub hostname: String,
    pub os: String,
    pub ip4: Option<String>,
    pub ip6: Option<String>,
    #[serde(rename = "teamID")]
    pub team_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostResponse {
    pub uuid: String,
    pub hostname: String,
    pub os: String,
    pub ip4: Option<String>,
    pub ip6: Option<String>,
    pub team: TeamSummary,
}

impl HostResponse {
    pub fn new(host: host_machine::Model, team: team::Model) -> Self {
        Self {
            uuid: host.uuid,
            hostname: host.hostname,
            os: host.os.as_str().to_string(),
            ip4: host.ip4,
            ip6: host.ip6,
            team: TeamSummary::from(team),
        }
    }
}
