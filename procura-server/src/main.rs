//! procura-server — B2B procurement platform backend
//!
//! Long-running service that:
//! - Manages buyer RFQs, supplier quotes and the order lifecycle
//! - Fans out notifications on order events
//! - Brokers OAuth login and account linking (Google, Facebook, WeChat demo)

mod api;
mod auth;
mod config;
mod db;
mod error;
mod state;
mod util;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "procura_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting procura-server (env: {})", config.environment);

    let state = AppState::new(&config).await?;
    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("procura-server listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
