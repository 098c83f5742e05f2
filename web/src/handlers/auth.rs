//! Authentication endpoints.
//!
//! ```text
//! GET  /auth/challenge?email=<principal>   -> 200 {nonce}         | 404
//! POST /auth/login-challenge {email, proof} -> 200 {token, user}  | 400 | 401
//! POST /auth/login {email, password}        -> 200 {token, user}  | 401
//! ```

use crate::error::AppError;
use crate::extractors::{ClientIp, CorrelationId, JsonBody};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use sps_auth::AuthenticatedSession;
use sps_auth::providers::UserRepository;

/// Query of `GET /auth/challenge`.
#[derive(Debug, Deserialize)]
pub struct ChallengeQuery {
    /// Principal to challenge.
    #[serde(default)]
    pub email: String,
}

/// Body of a successful `GET /auth/challenge`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengeResponse {
    /// Hex nonce to key the proof over.
    pub nonce: String,
}

/// Body of `POST /auth/login-challenge`.
#[derive(Debug, Deserialize)]
pub struct ProofRequest {
    /// Principal that requested the challenge.
    #[serde(default)]
    pub email: String,
    /// `HMAC-SHA256(secret, nonce)` as 64 hex digits.
    #[serde(default)]
    pub proof: String,
}

/// Body of `POST /auth/login`.
#[derive(Deserialize)]
pub struct PasswordRequest {
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Plaintext secret.
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for PasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Issue a challenge nonce.
///
/// # Errors
///
/// - 400 if `email` is missing or blank
/// - 404 if no account has this email
pub async fn challenge<U: UserRepository + 'static>(
    State(state): State<AppState<U>>,
    correlation_id: CorrelationId,
    Query(query): Query<ChallengeQuery>,
) -> Result<Json<ChallengeResponse>, AppError> {
    tracing::debug!(correlation_id = %correlation_id.0, principal = %query.email, "Challenge requested");

    let nonce = state.issuer.issue_challenge(&query.email).await?;

    Ok(Json(ChallengeResponse { nonce }))
}

/// Redeem a challenge with a proof.
///
/// # Errors
///
/// - 400 for a blank email, a proof that is not 64 hex digits, or an
///   absent or expired challenge (`CHALLENGE_EXPIRED`)
/// - 401 for an unknown principal or a wrong proof
pub async fn login_challenge<U: UserRepository + 'static>(
    State(state): State<AppState<U>>,
    ClientIp(ip): ClientIp,
    JsonBody(request): JsonBody<ProofRequest>,
) -> Result<Json<AuthenticatedSession>, AppError> {
    tracing::debug!(client_ip = %ip, principal = %request.email, "Proof submitted");

    let session = state
        .verifier
        .verify_proof(&request.email, &request.proof)
        .await?;

    Ok(Json(session))
}

/// Log in with a plaintext password.
///
/// # Errors
///
/// - 404 if password login is disabled
/// - 400 if either field is empty
/// - 401 for an unknown email or a wrong password
pub async fn login<U: UserRepository + 'static>(
    State(state): State<AppState<U>>,
    ClientIp(ip): ClientIp,
    JsonBody(request): JsonBody<PasswordRequest>,
) -> Result<Json<AuthenticatedSession>, AppError> {
    if !state.password_login.is_enabled() {
        return Err(AppError::not_found("Password login is disabled"));
    }

    tracing::debug!(client_ip = %ip, principal = %request.email, "Password login attempted");

    let session = state
        .password_login
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(session))
}
