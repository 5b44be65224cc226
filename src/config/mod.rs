// Config layer - environment-backed settings, secrets, store connection and logging
mod api_settings;
mod bootstrap_settings;
mod database;
mod env_provider;
pub mod errors;
mod logging;
mod secrets;
mod setting;

pub use api_settings::ApiSettings;
pub use bootstrap_settings::BootstrapSettings;
pub use database::{connect, init_database, migrate_database};
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig, LoggingError, init_logging};
pub use secrets::Secrets;
pub use setting::Setting;
