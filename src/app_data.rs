use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{ApiSettings, EnvironmentProvider, Secrets, SystemEnvironment};
use crate::errors::InternalError;
use crate::pipeline::Pipeline;
use crate::providers::{AuthenticationProvider, CryptoProvider, TokenProvider};
use crate::stores::{HostStore, IncidentStore, ProviderStore, TeamStore, UserStore};

/// Everything a request needs, created once in main.rs and shared behind an `Arc`
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db)
///   ├─ secrets, api_settings          (environment)
///   ├─ *_store                        (stateless data access)
///   └─ crypto / token / authentication providers
///   ↓ Arc<AppData> as poem `Data`
///   ├─ Pipeline (transaction + auth gate per request)
///   └─ *Coordinator::new(&app_data) per handler
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    pub secrets: Arc<Secrets>,
    pub api_settings: ApiSettings,

    pub user_store: Arc<UserStore>,
    pub team_store: Arc<TeamStore>,
    pub host_store: Arc<HostStore>,
    pub provider_store: Arc<ProviderStore>,
    pub incident_store: Arc<IncidentStore>,

    pub crypto_provider: Arc<CryptoProvider>,
    pub token_provider: Arc<TokenProvider>,
    pub authentication_provider: Arc<AuthenticationProvider>,
}

impl AppData {
    /// Initialize from the process environment
    ///
    /// The database should already be migrated.
    pub fn init(db: DatabaseConnection) -> Result<Self, InternalError> {
        Self::init_with(db, Arc::new(SystemEnvironment))
    }

    pub fn init_with(
        db: DatabaseConnection,
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        let secrets = Arc::new(
            Secrets::load(env_provider.as_ref()).map_err(|e| InternalError::parse("secrets", e.to_string()))?,
        );
        let api_settings = ApiSettings::load(env_provider.as_ref())
            .map_err(|e| InternalError::parse("api_settings", e.to_string()))?;
        tracing::debug!(issuer = api_settings.jwt_issuer(), "settings loaded");

        let user_store = Arc::new(UserStore::new());

        let crypto_provider = Arc::new(CryptoProvider::new(secrets.password_pepper()));
        let token_provider = Arc::new(TokenProvider::new(secrets.clone(), api_settings.clone()));
        let authentication_provider = Arc::new(AuthenticationProvider::new(
            user_store.clone(),
            crypto_provider.clone(),
            token_provider.clone(),
        ));

        tracing::info!("AppData initialization complete");

        Ok(Self {
            db,
            env_provider,
            secrets,
            api_settings,
            user_store,
            team_store: Arc::new(TeamStore::new()),
            host_store: Arc::new(HostStore::new()),
            provider_store: Arc::new(ProviderStore::new()),
            incident_store: Arc::new(IncidentStore::new()),
            crypto_provider,
            token_provider,
            authentication_provider,
        })
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.db.clone(), self.authentication_provider.clone())
    }
}
