//! Session tokens.
//!
//! Tokens are HS256 JWTs encoded with `jsonwebtoken`, so standard JWT
//! tooling can decode them. Verification is stateless: signature plus
//! expiry, nothing else. Expiry is checked against the injected [`Clock`]
//! rather than the system time, with no leeway.

use crate::config::TokenConfig;
use crate::environment::Clock;
use crate::error::{AuthError, Result};
use crate::state::{Principal, Role, UserId};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier.
    pub id: UserId,
    /// Login email.
    pub email: String,
    /// Account role.
    #[serde(rename = "type")]
    pub role: Role,
    /// Display name.
    pub name: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Signs and verifies session tokens.
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Create a token service.
    #[must_use]
    pub fn new(config: TokenConfig, clock: Arc<dyn Clock>) -> Self {
        let secret = config.secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // `exp` must be present; its value is checked against `clock` in `verify`
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            config,
            clock,
        }
    }

    /// Token validity window.
    #[must_use]
    pub const fn ttl(&self) -> chrono::Duration {
        self.config.ttl
    }

    /// Issue a token for `principal`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if the expiry is out of range or the
    /// claims cannot be encoded.
    pub fn issue(&self, principal: &Principal) -> Result<String> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.config.ttl)
            .ok_or_else(|| AuthError::Internal("Token expiry out of range".to_string()))?;

        let claims = Claims {
            id: principal.id.clone(),
            email: principal.email.clone(),
            role: principal.role,
            name: principal.name.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to encode token: {e}")))
    }

    /// Verify `token` and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for any failure: wrong structure,
    /// bad signature, unsupported algorithm or expiry.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "Token rejected");
                AuthError::InvalidToken
            })?
            .claims;

        if claims.exp <= self.clock.now().timestamp() {
            tracing::debug!(reason = "expired", "Token rejected");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
