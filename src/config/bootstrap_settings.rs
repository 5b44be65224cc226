use crate::config::errors::ConfigError;
use crate::config::setting::Setting;
use crate::config::{EnvironmentProvider, SystemEnvironment};

/// Store location and listen address, read before anything else starts
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
}

impl BootstrapSettings {
    pub fn load(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: Setting::new(env, "DATABASE_URL", "sqlite://aims.db?mode=rwc").text()?,
            server_host: Setting::new(env, "HOST", "0.0.0.0").host()?,
            server_port: Setting::new(env, "PORT", "8080").port()?,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(&SystemEnvironment)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    /// `host:port`, bracketing IPv6 literals
    pub fn server_address(&self) -> String {
        if self.server_host.contains(':') {
            format!("[{}]:{}", self.server_host, self.server_port)
        } else {
            format!("{}:{}", self.server_host, self.server_port)
        }
    }
}
