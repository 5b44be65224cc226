use std::fmt;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::config::{ApiSettings, Secrets};
use crate::errors::InternalError;
use crate::errors::internal::JwtValidationError;
use crate::types::internal::auth::Claims;

/// Issues and verifies HS256 bearer tokens
pub struct TokenProvider {
    secrets: Arc<Secrets>,
    settings: ApiSettings,
}

impl TokenProvider {
    pub fn new(secrets: Arc<Secrets>, settings: ApiSettings) -> Self {
        Self {
            secrets,
            settings,
        }
    }

    /// Sign a token whose subject is the base64 of `user_uuid`
    pub fn generate_jwt(&self, user_uuid: &str) -> Result<String, InternalError> {
        let now = Utc::now();
        let claims = Claims {
            iss: self.settings.jwt_issuer().to_string(),
            sub: general_purpose::STANDARD.encode(user_uuid.as_bytes()),
            iat: now.timestamp(),
            exp: (now + self.settings.jwt_expiration()).timestamp(),
        };
        self.encode_claims(&claims)
    }

    pub(crate) fn encode_claims(&self, claims: &Claims) -> Result<String, InternalError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secrets.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))
    }

    /// Verify signature, expiry (no leeway) and issuer
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[self.settings.jwt_issuer()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secrets.jwt_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "jwt rejected");
            JwtValidationError::from_jwt(e)
        })
    }

    /// The user UUID carried in `sub`
    pub fn subject_uuid(claims: &Claims) -> Result<String, JwtValidationError> {
        let bytes = general_purpose::STANDARD
            .decode(claims.sub.as_bytes())
            .map_err(|_| JwtValidationError::claims_rejected("sub"))?;
        let text = String::from_utf8(bytes).map_err(|_| JwtValidationError::claims_rejected("sub"))?;
        let uuid = Uuid::parse_str(&text).map_err(|_| JwtValidationError::claims_rejected("sub"))?;
        Ok(uuid.to_string())
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secrets", &"<redacted>")
            .field("settings", &self.settings)
            .finish()
    }
}
