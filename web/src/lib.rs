//! HTTP shell for SPS authentication.
//!
//! Thin axum handlers over the `sps-auth` services: extract, call, map the
//! result. Domain errors become HTTP responses through [`AppError`].
//!
//! # Request Flow
//!
//! 1. **Correlation id** assigned and attached to the request span
//! 2. **Rate limit** checked per client address on `/auth` routes
//! 3. **Extract** query, JSON body and bearer claims
//! 4. **Call** the issuer, verifier, password login or account service
//! 5. **Map** `AuthError` to status and `{code, message}` body
//!
//! # Example
//!
//! ```ignore
//! use sps_web::{AppState, Config, app_router};
//! use sps_auth::stores::JsonFileUserRepository;
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//!
//! let config = Config::from_env();
//! let users = Arc::new(JsonFileUserRepository::open(&config.server.database_path).await?);
//! let app = app_router(AppState::new(users, &config));
//!
//! let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//! axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use config::Config;
pub use error::AppError;
pub use extractors::{AuthUser, BearerToken, ClientIp, CorrelationId, JsonBody};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
pub use router::app_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
