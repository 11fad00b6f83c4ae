//! Kasse API Server
//!
//! Main entry point for the Kasse ledger service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kasse_api::{AppState, create_router};
use kasse_core::ledger::{Directory, LedgerService};
use kasse_rates::ExchangeRateClient;
use kasse_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kasse=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Seed the account directory
    let directory = Directory::seed(config.ledger.accounts.iter().cloned());
    info!(accounts = ?config.ledger.accounts, "Account directory seeded");

    // Wire the rate provider into the ledger
    let rates = ExchangeRateClient::new(&config.rates)
        .context("Failed to build exchange-rate client")?;
    info!(base_url = %config.rates.base_url, "Exchange-rate client configured");

    let ledger = LedgerService::new(directory, Arc::new(rates));

    // Create application state
    let state = AppState {
        ledger: Arc::new(ledger),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
