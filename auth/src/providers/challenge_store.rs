//! Challenge storage trait.
//!
//! # Security
//!
//! Challenges must be:
//! - **Single-use**: taken atomically so two verifications cannot both succeed
//! - **Ephemeral**: redeemable only until `expires_at`
//! - **Per principal**: a new challenge replaces any unredeemed one
//!
//! # Example
//!
//! ```ignore
//! challenges.store_challenge("admin@sps.com", challenge).await?;
//!
//! match challenges.take_challenge("admin@sps.com").await? {
//!     Some(c) if !c.is_expired(now) => verify(c.nonce),
//!     _ => return Err(AuthError::ExpiredChallenge),
//! }
//! ```

use crate::error::Result;
use chrono::{DateTime, Utc};
use std::future::Future;

/// An outstanding challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Hex-encoded random nonce.
    pub nonce: String,

    /// Last instant at which the nonce is redeemable.
    pub expires_at: DateTime<Utc>,
}

impl Challenge {
    /// Create a challenge.
    #[must_use]
    pub const fn new(nonce: String, expires_at: DateTime<Utc>) -> Self {
        Self { nonce, expires_at }
    }

    /// Returns `true` once `now` is strictly past `expires_at`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Challenge table keyed by principal identifier.
pub trait ChallengeStore: Send + Sync {
    /// Record a challenge for `principal`, replacing any prior one.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn store_challenge(
        &self,
        principal: &str,
        challenge: Challenge,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Remove and return the challenge for `principal`.
    ///
    /// This operation is **atomic**: concurrent takes for the same principal
    /// yield the challenge to exactly one caller. Expired entries are still
    /// returned (and removed); the caller checks expiry.
    ///
    /// # Errors
    ///
    /// Returns error only on storage failures, not on a missing challenge.
    fn take_challenge(
        &self,
        principal: &str,
    ) -> impl Future<Output = Result<Option<Challenge>>> + Send;
}
