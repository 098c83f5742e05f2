//! In-memory challenge table.
//!
//! Lives for the lifetime of the process and is shared by handle between the
//! issuer and the verifier. Entries are never reaped in the background: an
//! unredeemed challenge stays until the principal asks for a new one or
//! redeems it.

use crate::error::{AuthError, Result};
use crate::providers::{Challenge, ChallengeStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Process-local challenge store.
///
/// Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChallengeStore {
    challenges: Arc<Mutex<HashMap<String, Challenge>>>,
}

impl InMemoryChallengeStore {
    /// Create an empty challenge table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of outstanding challenges, expired ones included.
    ///
    /// # Errors
    ///
    /// Returns error if the table lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Returns `true` if no challenge is outstanding.
    ///
    /// # Errors
    ///
    /// Returns error if the table lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Challenge>>> {
        self.challenges
            .lock()
            .map_err(|_| AuthError::Internal("challenge table lock poisoned".into()))
    }
}

impl ChallengeStore for InMemoryChallengeStore {
    async fn store_challenge(&self, principal: &str, challenge: Challenge) -> Result<()> {
        let replaced = self.lock()?.insert(principal.to_string(), challenge).is_some();

        if replaced {
            tracing::debug!(principal = %principal, "Replaced unredeemed challenge");
        }

        Ok(())
    }

    async fn take_challenge(&self, principal: &str) -> Result<Option<Challenge>> {
        // Single remove under the lock: at most one caller gets the entry.
        Ok(self.lock()?.remove(principal))
    }
}
