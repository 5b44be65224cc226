use std::sync::Arc;

use clap::Parser;
use poem::{Server, listener::TcpListener};

use aims_backend::AppData;
use aims_backend::api;
use aims_backend::cli::bootstrap::{self, BootstrapRequest};
use aims_backend::cli::{Cli, Commands, migrate};
use aims_backend::config::{
    BootstrapSettings, LoggingConfig, SystemEnvironment, init_database, init_logging, migrate_database,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let _log_guard = init_logging(&LoggingConfig::load(&SystemEnvironment))?;

    let cli = Cli::parse();

    let settings = BootstrapSettings::from_env().map_err(|e| {
        tracing::error!("Invalid bootstrap settings: {}", e);
        e
    })?;

    match cli.command() {
        Commands::Migrate => migrate::run_migrations(&settings).await,
        Commands::Bootstrap {
            email,
            name,
            team,
            password,
        } => {
            let app_data = init_app(&settings).await?;
            bootstrap::run(
                &app_data,
                BootstrapRequest {
                    email,
                    name,
                    team,
                    password,
                },
            )
            .await
        }
        Commands::Serve => serve(&settings).await,
    }
}

async fn init_app(settings: &BootstrapSettings) -> Result<AppData, Box<dyn std::error::Error>> {
    let db = init_database(settings).await?;
    migrate_database(&db).await?;

    let app_data = AppData::init(db).map_err(|e| {
        tracing::error!("Failed to initialize AppData: {}", e);
        e
    })?;
    Ok(app_data)
}

async fn serve(settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    let app_data = Arc::new(init_app(settings).await?);
    let address = settings.server_address();

    tracing::info!("Starting server on http://{}", address);

    Server::new(TcpListener::bind(address))
        .run(api::routes(app_data))
        .await?;

    Ok(())
}
