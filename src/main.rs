// SPDX-License-Identifier: MIT

//! Vidstream API Server
//!
//! Backend for a video-hosting platform: user accounts, session tokens,
//! subscriptions and watch history.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidstream_api::{
    config::Config,
    db::Db,
    services::{AssetHostClient, TokenService},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Vidstream API");

    // Credential store (users, subscriptions, videos)
    let db = Db::new();

    // Asset host client for avatar/cover uploads. Credentials are injected
    // here once rather than read from ambient globals at call sites.
    let assets = AssetHostClient::new(config.asset_host.clone());
    tracing::info!(cloud = %config.asset_host.cloud_name, "Asset host client initialized");

    // Token service with distinct access/refresh secrets and lifetimes
    let tokens = TokenService::new(&config);

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        assets,
        tokens,
    });

    let app = vidstream_api::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vidstream_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
