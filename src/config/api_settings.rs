use chrono::Duration;

use crate::config::errors::ConfigError;
use crate::config::setting::Setting;
use crate::config::EnvironmentProvider;

/// Token issuer, token lifetime and the cookie `Secure` flag
#[derive(Debug, Clone)]
pub struct ApiSettings {
    jwt_issuer: String,
    jwt_expiration_hours: i64,
    secure_cookies: bool,
}

impl ApiSettings {
    pub fn load(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        Ok(Self {
            jwt_issuer: Setting::new(env, "JWT_ISSUER", "AIMS").text()?,
            jwt_expiration_hours: Setting::new(env, "JWT_EXPIRATION_HOURS", "24").integer(1..=720)?,
            secure_cookies: Setting::new(env, "SECURE_COOKIES", "false").flag()?,
        })
    }

    pub fn jwt_issuer(&self) -> &str {
        &self.jwt_issuer
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::hours(self.jwt_expiration_hours)
    }

    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            jwt_issuer: "AIMS".to_string(),
            jwt_expiration_hours: 24,
            secure_cookies: false,
        }
    }
}
