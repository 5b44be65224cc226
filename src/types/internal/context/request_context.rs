use std::net::IpAddr;
use std::time::Instant;

use poem::Request;

use crate::types::db::user;

use super::request_id::RequestId;

/// Per-request state owned by the pipeline and lent to handlers
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,

    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    pub method: String,
    pub path: String,

    pub started_at: Instant,

    /// Set by the auth gate once the bearer token resolves to a user
    pub user: Option<user::Model>,
}

impl RequestContext {
    pub fn from_request(req: &Request) -> Self {
        Self {
            request_id: RequestId::new(),
            ip_address: Self::extract_ip_address(req),
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            started_at: Instant::now(),
            user: None,
        }
    }

    /// Context for work started from the command line
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            request_id: RequestId::new(),
            ip_address: None,
            method: "CLI".to_string(),
            path: command_name.to_string(),
            started_at: Instant::now(),
            user: None,
        }
    }

    /// Checks X-Forwarded-For, X-Real-IP, then the remote address
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.trim().parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    pub fn with_user(mut self, user: user::Model) -> Self {
        self.user = Some(user);
        self
    }

    pub fn elapsed_micros(&self) -> u128 {
        self.started_at.elapsed().as_micros()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.admin)
    }
}
