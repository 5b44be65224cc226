use std::sync::Arc;

use chrono::Utc;
use sea_orm::ConnectionTrait;

use crate::AppData;
use crate::errors::ApiError;
use crate::providers::CryptoProvider;
use crate::stores::{HostStore, IncidentFilter, IncidentStore, TeamStore, UserStore};
use crate::types::db::{incident, incident_comment, user};
use crate::types::dto::incident::{
    CommentRequest, CommentResponse, CreateIncidentRequest, IncidentResponse, UpdateIncidentRequest,
};
use crate::types::dto::host::HostResponse;
use crate::types::dto::team::TeamResponse;
use crate::types::dto::user::UserSummary;
use crate::types::internal::{Page, PageParams, RequestContext};

/// Incident lifecycle: creation with dedup hash, full-replace updates,
/// the one-way resolve transition, and comments
pub struct IncidentCoordinator {
    incidents: Arc<IncidentStore>,
    hosts: Arc<HostStore>,
    teams: Arc<TeamStore>,
    users: Arc<UserStore>,
}

/// What an update does to the resolution state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    Unchanged,
    Resolve,
}

impl Resolution {
    /// `resolved: true` only moves an open incident; there is no way back
    pub(crate) fn decide(requested: Option<bool>, currently_resolved: bool) -> Result<Self, ApiError> {
        match (requested, currently_resolved) {
            (Some(true), false) => Ok(Resolution::Resolve),
            (Some(false), true) => Err(ApiError::bad_request("resolved incidents cannot be reopened")),
            _ => Ok(Resolution::Unchanged),
        }
    }
}

impl IncidentCoordinator {
    pub fn new(app_data: &AppData) -> Self {
        Self {
            incidents: Arc::clone(&app_data.incident_store),
            hosts: Arc::clone(&app_data.host_store),
            teams: Arc::clone(&app_data.team_store),
            users: Arc::clone(&app_data.user_store),
        }
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        resolved: Option<bool>,
        my_teams: bool,
        hash: Option<String>,
        params: PageParams,
    ) -> Result<Page<IncidentResponse>, ApiError> {
        let member_of_teams = if my_teams {
            Some(super::acting_user(ctx)?.id)
        } else {
            None
        };
        let filter = IncidentFilter {
            resolved,
            hash,
            member_of_teams,
        };

        let (incidents, total) = self.incidents.list(conn, &filter, params).await?;

        let mut data = Vec::with_capacity(incidents.len());
        for incident in incidents {
            data.push(self.respond(conn, incident).await?);
        }
        Ok(Page { data, meta: params.meta(total) })
    }

    pub async fn get(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<IncidentResponse, ApiError> {
        let incident = self.find(conn, uuid).await?;
        self.respond(conn, incident).await
    }

    /// Hosts and teams are checked before anything is written
    pub async fn create(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        request: CreateIncidentRequest,
    ) -> Result<incident::Model, ApiError> {
        let host_ids = self.resolve_hosts(conn, &request.hosts_affected).await?;
        let team_ids = self.resolve_teams(conn, &request.resolution_teams).await?;

        let hash = request
            .hash
            .filter(|hash| !hash.trim().is_empty())
            .unwrap_or_else(|| CryptoProvider::sha256_hex(&request.summary));

        // the unique index still decides under concurrent creates
        if self.incidents.find_by_hash(conn, &hash).await?.is_some() {
            return Err(ApiError::bad_request("an incident with this hash already exists"));
        }

        let created = self
            .incidents
            .create(conn, &request.summary, &request.description, &hash)
            .await?;
        self.incidents.replace_teams(conn, created.id, &team_ids).await?;
        self.incidents.replace_hosts(conn, created.id, &host_ids).await?;

        tracing::info!(request_id = %ctx.request_id, incident_uuid = %created.uuid, hash = %created.hash, "incident created");
        Ok(created)
    }

    /// Scalars, then resolution teams, then affected hosts; all on the caller's transaction
    pub async fn update(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        uuid: &str,
        request: UpdateIncidentRequest,
    ) -> Result<(), ApiError> {
        let actor = super::acting_user(ctx)?;
        let existing = self.find(conn, uuid).await?;

        let resolution = match Resolution::decide(request.resolved, existing.is_resolved())? {
            Resolution::Resolve => Some((Utc::now(), actor.id)),
            Resolution::Unchanged => None,
        };

        let host_ids = self.resolve_hosts(conn, &request.hosts_affected).await?;
        let team_ids = self.resolve_teams(conn, &request.resolution_teams).await?;

        let updated = self
            .incidents
            .update(conn, existing, &request.summary, &request.description, resolution)
            .await?;
        self.incidents.replace_teams(conn, updated.id, &team_ids).await?;
        self.incidents.replace_hosts(conn, updated.id, &host_ids).await?;

        if resolution.is_some() {
            tracing::info!(request_id = %ctx.request_id, incident_uuid = %uuid, resolved_by = %actor.uuid, "incident resolved");
        } else {
            tracing::info!(request_id = %ctx.request_id, incident_uuid = %uuid, "incident updated");
        }
        Ok(())
    }

    /// Incidents are permanent; the entity hook refuses every delete
    pub async fn delete(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<(), ApiError> {
        match self.incidents.find_by_uuid(conn, uuid).await? {
            Some(existing) => Ok(self.incidents.delete(conn, existing).await?),
            None => Err(ApiError::bad_request("incidents cannot be deleted")),
        }
    }

    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        incident_uuid: &str,
        request: CommentRequest,
    ) -> Result<incident_comment::Model, ApiError> {
        let author = super::acting_user(ctx)?;
        let incident = self.find(conn, incident_uuid).await?;

        let comment = self
            .incidents
            .create_comment(conn, incident.id, author.id, &request.comment)
            .await?;
        tracing::info!(request_id = %ctx.request_id, incident_uuid = %incident_uuid, comment_uuid = %comment.uuid, "comment added");
        Ok(comment)
    }

    /// Only the author or an admin may delete a comment
    pub async fn delete_comment(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        incident_uuid: &str,
        comment_uuid: &str,
    ) -> Result<(), ApiError> {
        let actor = super::acting_user(ctx)?;
        let incident = self.find(conn, incident_uuid).await?;
        let comment = self
            .incidents
            .find_comment(conn, incident.id, comment_uuid)
            .await?
            .ok_or_else(|| ApiError::not_found("comment not found"))?;

        if comment.commented_by_id != actor.id && !actor.admin {
            tracing::warn!(request_id = %ctx.request_id, comment_uuid = %comment_uuid, user_uuid = %actor.uuid, "comment delete refused");
            return Err(ApiError::forbidden("you are not allowed to delete this comment"));
        }

        self.incidents.delete_comment(conn, comment).await?;
        tracing::info!(request_id = %ctx.request_id, comment_uuid = %comment_uuid, "comment deleted");
        Ok(())
    }

    async fn find(&self, conn: &impl ConnectionTrait, uuid: &str) -> Result<incident::Model, ApiError> {
        self.incidents
            .find_by_uuid(conn, uuid)
            .await?
            .ok_or_else(|| ApiError::not_found("incident not found"))
    }

    async fn resolve_hosts(&self, conn: &impl ConnectionTrait, uuids: &[String]) -> Result<Vec<i32>, ApiError> {
        let wanted = super::dedupe(uuids, "host")?;
        let found = self.hosts.find_by_uuids(conn, &wanted).await?;
        if found.len() != wanted.len() {
            return Err(ApiError::bad_request("one or more hosts not found"));
        }
        Ok(found.iter().map(|host| host.id).collect())
    }

    async fn resolve_teams(&self, conn: &impl ConnectionTrait, uuids: &[String]) -> Result<Vec<i32>, ApiError> {
        let teams = super::resolve_teams(&self.teams, conn, uuids).await?;
        Ok(teams.iter().map(|team| team.id).collect())
    }

    async fn respond(&self, conn: &impl ConnectionTrait, incident: incident::Model) -> Result<IncidentResponse, ApiError> {
        let resolved_by = match incident.resolved_by_id {
            Some(user_id) => self.users.find_by_id(conn, user_id).await?.map(UserSummary::from),
            None => None,
        };

        let hosts_affected = self
            .incidents
            .hosts(conn, &incident)
            .await?
            .into_iter()
            .map(|(host, team)| HostResponse::new(host, team))
            .collect();

        let mut resolution_teams = Vec::new();
        for team in self.incidents.teams(conn, &incident).await? {
            let members = self.teams.members(conn, &team).await?;
            resolution_teams.push(TeamResponse::new(team, members));
        }

        let comments = self
            .incidents
            .comments(conn, &incident)
            .await?
            .into_iter()
            .map(|(comment, author)| comment_response(comment, author))
            .collect();

        Ok(IncidentResponse {
            uuid: incident.uuid,
            summary: incident.summary,
            description: incident.description,
            hash: incident.hash,
            created_at: incident.created_at,
            resolved_at: incident.resolved_at,
            resolved_by,
            hosts_affected,
            resolution_teams,
            comments,
        })
    }
}

fn comment_response(comment: incident_comment::Model, author: user::Model) -> CommentResponse {
    CommentResponse {
        uuid: comment.uuid,
        comment: comment.comment,
        commented_at: comment.commented_at,
        commented_by: UserSummary::from(author),
    }
}
