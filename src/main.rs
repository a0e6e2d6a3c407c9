//! Shelfmark - Terminal Library Management System

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelfmark::{config::AppConfig, menu, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("shelfmark={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Shelfmark v{}", env!("CARGO_PKG_VERSION"));

    // Open the two stores and create tables on first run
    let repository = Repository::connect(&config.stores).await?;
    repository.setup_schema().await?;
    repository.rules.seed(&config.rules).await?;

    tracing::info!("Connected to accounts and library stores");

    let services = Services::new(repository, config.signup.clone());

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    menu::run(state).await
}
