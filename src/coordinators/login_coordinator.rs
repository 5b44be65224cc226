use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::AppData;
use crate::errors::ApiError;
use crate::providers::AuthenticationProvider;
use crate::types::dto::user::LoginRequest;
use crate::types::internal::RequestContext;

pub struct LoginCoordinator {
    authentication_provider: Arc<AuthenticationProvider>,
}

impl LoginCoordinator {
    pub fn new(app_data: &AppData) -> Self {
        Self {
            authentication_provider: Arc::clone(&app_data.authentication_provider),
        }
    }

    /// Exchange an email/password pair for a signed bearer token
    pub async fn login(
        &self,
        ctx: &RequestContext,
        conn: &impl ConnectionTrait,
        already_authenticated: bool,
        request: LoginRequest,
    ) -> Result<String, ApiError> {
        if already_authenticated {
            return Err(ApiError::already_authenticated());
        }

        let user = self
            .authentication_provider
            .verify_credential(conn, &request.email, &request.password)
            .await?;
        let token = self.authentication_provider.issue_token(&user)?;

        tracing::info!(request_id = %ctx.request_id, user_uuid = %user.uuid, "user logged in");
        Ok(token)
    }
}
