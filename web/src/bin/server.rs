//! SPS authentication server.
//!
//! ```bash
//! JWT_SECRET=change-me DATABASE_PATH=./db.json cargo run -p sps-web --bin sps-server
//! ```

use anyhow::Context;
use sps_auth::stores::JsonFileUserRepository;
use sps_web::{AppState, Config, app_router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sps_web=debug,sps_auth=debug".into()),
        )
        .with(fmt::layer())
        .init();

    let config = Config::from_env();

    if config.auth.token.uses_dev_secret() {
        tracing::warn!("JWT_SECRET is not set; signing tokens with the development secret");
    }
    if config.auth.password_login {
        tracing::warn!("Password login is enabled; secrets may be sent over the wire");
    }
    if config.server.trust_proxy {
        tracing::info!("Identifying clients by X-Forwarded-For / X-Real-IP");
    }

    let users = Arc::new(
        JsonFileUserRepository::open(&config.server.database_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to open user database at {}",
                    config.server.database_path.display()
                )
            })?,
    );
    tracing::info!(path = %users.path().display(), "User database ready");

    let mut state = AppState::new(users, &config);
    if config.server.metrics_enabled {
        match sps_web::metrics::install_recorder() {
            Ok(handle) => state = state.with_metrics(handle),
            Err(e) => tracing::warn!(error = %e, "Metrics export disabled"),
        }
    }

    let app = app_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(address = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
