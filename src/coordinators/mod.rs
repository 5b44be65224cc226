// Coordinators layer - one workflow per API operation
//
// Coordinators compose store and provider calls on the request's transaction
// and translate missing records into caller-facing errors. They never commit;
// the pipeline owns the transaction.

pub mod host_coordinator;
pub mod incident_coordinator;
pub mod login_coordinator;
pub mod provider_coordinator;
pub mod team_coordinator;
pub mod user_coordinator;

pub use host_coordinator::HostCoordinator;
pub use incident_coordinator::IncidentCoordinator;
pub use login_coordinator::LoginCoordinator;
pub use provider_coordinator::ProviderCoordinator;
pub use team_coordinator::TeamCoordinator;
pub use user_coordinator::UserCoordinator;

use std::collections::HashSet;

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::stores::TeamStore;
use crate::types::db::{team, user};
use crate::types::internal::RequestContext;

/// The user the auth gate attached to the request
pub(crate) fn acting_user(ctx: &RequestContext) -> Result<&user::Model, ApiError> {
    ctx.user.as_ref().ok_or_else(ApiError::missing_token)
}

/// Canonical form of a UUID taken from a request body
pub(crate) fn canonical_uuid(raw: &str, resource: &str) -> Result<String, ApiError> {
    Uuid::parse_str(raw.trim())
        .map(|uuid| uuid.to_string())
        .map_err(|_| ApiError::bad_request(format!("invalid {} UUID", resource)))
}

/// Canonicalize and drop repeated identifiers, keeping first-seen order
pub(crate) fn dedupe(uuids: &[String], resource: &str) -> Result<Vec<String>, ApiError> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(uuids.len());
    for raw in uuids {
        let uuid = canonical_uuid(raw, resource)?;
        if seen.insert(uuid.clone()) {
            unique.push(uuid);
        }
    }
    Ok(unique)
}

/// Every listed team must exist; nothing is written when one is missing
pub(crate) async fn resolve_teams(
    teams: &TeamStore,
    conn: &impl ConnectionTrait,
    uuids: &[String],
) -> Result<Vec<team::Model>, ApiError> {
    let wanted = dedupe(uuids, "team")?;
    let found = teams.find_by_uuids(conn, &wanted).await?;
    if found.len() != wanted.len() {
        return Err(ApiError::bad_request("one or more teams not found"));
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "6f9619ff-8b86-4d11-b42d-00c04fc964ff";
    const B: &str = "0e4a1c2d-3b5f-4a6e-8d7c-9b0a1f2e3d4c";

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let uuids = [B, A, B, A].map(String::from);
        assert_eq!(dedupe(&uuids, "team").unwrap(), [B, A].map(String::from).to_vec());
    }

    #[test]
    fn test_dedupe_folds_case_variants() {
        let uuids = [A.to_uppercase(), A.to_string()];
        assert_eq!(dedupe(&uuids, "host").unwrap(), vec![A.to_string()]);
    }

    #[test]
    fn test_dedupe_rejects_malformed_identifier() {
        let uuids = [A.to_string(), "web-01".to_string()];
        assert_eq!(
            dedupe(&uuids, "host").unwrap_err(),
            ApiError::bad_request("invalid host UUID")
        );
    }
}
