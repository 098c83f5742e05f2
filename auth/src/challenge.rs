//! Challenge issuance.

use crate::config::ChallengeConfig;
use crate::environment::Clock;
use crate::error::{AuthError, Result};
use crate::proof::generate_nonce;
use crate::providers::{Challenge, ChallengeStore, UserRepository};
use std::sync::Arc;

/// Issues single-use nonces to known principals.
pub struct ChallengeIssuer<U, C> {
    users: Arc<U>,
    challenges: Arc<C>,
    clock: Arc<dyn Clock>,
    config: ChallengeConfig,
}

impl<U, C> ChallengeIssuer<U, C>
where
    U: UserRepository,
    C: ChallengeStore,
{
    /// Create an issuer over the given directory and challenge table.
    #[must_use]
    pub fn new(
        users: Arc<U>,
        challenges: Arc<C>,
        clock: Arc<dyn Clock>,
        config: ChallengeConfig,
    ) -> Self {
        Self {
            users,
            challenges,
            clock,
            config,
        }
    }

    /// Issue a challenge for `principal` and return its nonce.
    ///
    /// Any unredeemed challenge for the same principal is replaced.
    ///
    /// # Errors
    ///
    /// - `AuthError::MalformedInput` if `principal` is blank
    /// - `AuthError::NotFound` if no account has this email; nothing is stored
    /// - `AuthError::Internal` if the configured TTL overflows the clock
    /// - storage errors from the directory or challenge table
    pub async fn issue_challenge(&self, principal: &str) -> Result<String> {
        if principal.trim().is_empty() {
            return Err(AuthError::MalformedInput("email is required".to_string()));
        }

        if self.users.find_by_email(principal).await?.is_none() {
            tracing::info!(principal = %principal, "Challenge requested for unknown principal");
            metrics::counter!("auth_challenges_rejected_total").increment(1);
            return Err(AuthError::NotFound);
        }

        let expires_at = self
            .clock
            .now()
            .checked_add_signed(self.config.ttl)
            .ok_or_else(|| AuthError::Internal("Challenge expiry out of range".to_string()))?;
        let nonce = generate_nonce();

        self.challenges
            .store_challenge(principal, Challenge::new(nonce.clone(), expires_at))
            .await?;

        tracing::info!(
            principal = %principal,
            expires_at = %expires_at,
            "Challenge issued"
        );
        metrics::counter!("auth_challenges_issued_total").increment(1);

        Ok(nonce)
    }
}
