//! Custom Axum extractors.
//!
//! This module contains custom extractors for common HTTP patterns:
//! - `CorrelationId`: Extract or generate request correlation IDs
//! - `ClientIp`: Client address from the connection, or from proxy headers
//!   when the server trusts its proxy
//! - `BearerToken`: Raw token from the `Authorization` header
//! - `AuthUser`: Verified token claims of the caller
//! - `JsonBody`: JSON body whose rejections are reported as 400
//!
//! # Examples
//!
//! ```ignore
//! use sps_web::extractors::{AuthUser, CorrelationId};
//!
//! async fn handler(
//!     State(state): State<AppState<U>>,
//!     correlation_id: CorrelationId,
//!     AuthUser(claims): AuthUser,
//! ) -> Result<Json<Vec<PublicUser>>, AppError> {
//!     tracing::info!(
//!         correlation_id = %correlation_id.0,
//!         caller = %claims.id,
//!         "Listing users"
//!     );
//!     Ok(Json(state.accounts.list().await?))
//! }
//! ```

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json, async_trait,
    extract::{ConnectInfo, FromRequest, FromRequestParts, Request},
    http::{HeaderMap, header, request::Parts},
};
use serde::de::DeserializeOwned;
use sps_auth::providers::UserRepository;
use sps_auth::{Actor, Claims};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use uuid::Uuid;

/// Message for every authentication failure on protected routes.
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Correlation ID for request tracing.
///
/// Extracts the correlation ID from the `X-Correlation-ID` header,
/// or generates a new UUID v4 if not present.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Prefer the id assigned by the correlation middleware
        if let Some(id) = parts.extensions.get::<Uuid>() {
            return Ok(Self(*id));
        }

        let correlation_id = parts
            .headers
            .get(crate::middleware::CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// Client IP address.
///
/// By default this is the socket peer address, which clients cannot forge.
/// With `TRUST_PROXY` set, forwarding headers take precedence:
///
/// 1. `X-Forwarded-For` (first IP in the list)
/// 2. `X-Real-IP`
/// 3. Connection IP
///
/// Falls back to `127.0.0.1` when the router is served without connect info.
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub IpAddr);

#[async_trait]
impl<U> FromRequestParts<AppState<U>> for ClientIp
where
    U: UserRepository + 'static,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<U>,
    ) -> Result<Self, Self::Rejection> {
        let ip = extract_client_ip(&parts.headers, parts.extensions.get(), state.trust_proxy);

        Ok(Self(ip))
    }
}

/// Extract client IP from the connection, consulting headers only when
/// `trust_proxy` is set.
fn extract_client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trust_proxy: bool,
) -> IpAddr {
    let peer = connect_info.map(|ConnectInfo(addr)| addr.ip());

    if !trust_proxy {
        return peer.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    let forwarded = headers
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    let real_ip = || {
        headers
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    };

    forwarded
        .or_else(real_ip)
        .or(peer)
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Bearer token from the `Authorization` header.
///
/// Rejects with 401 when the header is missing, not a bearer credential,
/// or empty.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized(NOT_AUTHENTICATED))?;

        let token = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized(NOT_AUTHENTICATED))?;

        Ok(Self(token.to_string()))
    }
}

/// Verified claims of the caller.
///
/// Every failure (missing header, bad signature, malformed or expired token)
/// becomes the same 401 response.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The caller as seen by the authorization rules.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::from(&self.0)
    }
}

#[async_trait]
impl<U> FromRequestParts<AppState<U>> for AuthUser
where
    U: UserRepository + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<U>,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        let claims = state
            .tokens
            .verify(&token)
            .map_err(|_| AppError::unauthorized(NOT_AUTHENTICATED))?;

        Ok(Self(claims))
    }
}

/// JSON request body.
///
/// Syntax errors, missing fields and a wrong content type all become
/// `400 {"code": "BAD_REQUEST", "message": "Invalid data"}`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Err(AppError::bad_request("Invalid data"))
            }
        }
    }
}
