//! Proof verification.
//!
//! Order of checks:
//!
//! 1. Shape: non-empty principal, 64 hex digit proof. Nothing is looked up
//!    for malformed input.
//! 2. Principal lookup. Unknown principals fail exactly like a wrong proof.
//! 3. Take the outstanding challenge. Taking removes it, so the nonce is
//!    spent whatever happens next.
//! 4. Expiry, then a constant-time proof comparison.

use crate::environment::Clock;
use crate::error::{AuthError, Result};
use crate::proof::{is_well_formed_proof, verify_proof};
use crate::providers::{ChallengeStore, UserRepository};
use crate::state::AuthenticatedSession;
use crate::token::TokenService;
use std::sync::Arc;

/// Redeems challenges for session tokens.
pub struct ProofVerifier<U, C> {
    users: Arc<U>,
    challenges: Arc<C>,
    tokens: Arc<TokenService>,
    clock: Arc<dyn Clock>,
}

impl<U, C> ProofVerifier<U, C>
where
    U: UserRepository,
    C: ChallengeStore,
{
    /// Create a verifier sharing the issuer's challenge table.
    #[must_use]
    pub fn new(
        users: Arc<U>,
        challenges: Arc<C>,
        tokens: Arc<TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            challenges,
            tokens,
            clock,
        }
    }

    /// Verify `proof_hex` for `principal` and open a session.
    ///
    /// # Errors
    ///
    /// - `AuthError::MalformedInput` for a blank principal or a proof that is
    ///   not 64 hex digits
    /// - `AuthError::InvalidCredentials` for an unknown principal or a wrong proof
    /// - `AuthError::ExpiredChallenge` if no challenge is outstanding or it expired
    pub async fn verify_proof(
        &self,
        principal: &str,
        proof_hex: &str,
    ) -> Result<AuthenticatedSession> {
        if principal.trim().is_empty() {
            return Err(AuthError::MalformedInput("email is required".to_string()));
        }
        if !is_well_formed_proof(proof_hex) {
            return Err(AuthError::MalformedInput(
                "proof must be 64 hexadecimal characters".to_string(),
            ));
        }

        let Some(account) = self.users.find_by_email(principal).await? else {
            tracing::warn!(principal = %principal, "Proof submitted for unknown principal");
            metrics::counter!("auth_logins_failed_total", "mode" => "challenge").increment(1);
            return Err(AuthError::InvalidCredentials);
        };

        let challenge = match self.challenges.take_challenge(principal).await? {
            Some(challenge) if !challenge.is_expired(self.clock.now()) => challenge,
            stale => {
                tracing::warn!(
                    principal = %principal,
                    had_challenge = stale.is_some(),
                    "No redeemable challenge"
                );
                metrics::counter!("auth_logins_failed_total", "mode" => "challenge").increment(1);
                return Err(AuthError::ExpiredChallenge);
            }
        };

        if !verify_proof(&account.secret, &challenge.nonce, proof_hex) {
            tracing::warn!(principal = %principal, "Proof mismatch");
            metrics::counter!("auth_logins_failed_total", "mode" => "challenge").increment(1);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&account)?;

        tracing::info!(principal = %principal, user_id = %account.id, "Challenge login succeeded");
        metrics::counter!("auth_logins_total", "mode" => "challenge").increment(1);

        Ok(AuthenticatedSession {
            token,
            user: account.to_public(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;
    use crate::environment::SystemClock;
    use crate::mocks::MockUserRepository;
    use crate::proof::expected_proof;
    use crate::providers::Challenge;
    use crate::state::{Principal, Role, UserId};
    use crate::stores::InMemoryChallengeStore;
    use chrono::{Duration, Utc};

    struct Fixture {
        users: Arc<MockUserRepository>,
        challenges: Arc<InMemoryChallengeStore>,
        verifier: ProofVerifier<MockUserRepository, InMemoryChallengeStore>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(MockUserRepository::with_users([Principal {
            id: UserId::from("1"),
            name: "Admin User".to_string(),
            email: "admin@sps.com".to_string(),
            role: Role::Admin,
            secret: "admin123".to_string(),
        }]));
        let challenges = Arc::new(InMemoryChallengeStore::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let tokens = Arc::new(TokenService::new(TokenConfig::default(), Arc::clone(&clock)));
        let verifier =
            ProofVerifier::new(Arc::clone(&users), Arc::clone(&challenges), tokens, clock);
        Fixture {
            users,
            challenges,
            verifier,
        }
    }

    async fn plant(store: &InMemoryChallengeStore, nonce: &str, ttl: Duration) {
        store
            .store_challenge("admin@sps.com", Challenge::new(nonce.to_string(), Utc::now() + ttl))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_correct_proof_opens_session() {
        let f = fixture();
        plant(&f.challenges, "n1", Duration::minutes(5)).await;

        let session = f
            .verifier
            .verify_proof("admin@sps.com", &expected_proof("admin123", "n1").unwrap())
            .await
            .unwrap();

        assert_eq!(session.user.email, "admin@sps.com");
        assert_eq!(session.user.role, Role::Admin);
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_proof_rejected_before_lookup() {
        let f = fixture();
        plant(&f.challenges, "n1", Duration::minutes(5)).await;

        let proofs = [
            String::new(),
            "abc".to_string(),
            "g".repeat(64),
            "a".repeat(63),
            "a".repeat(65),
        ];
        for proof in &proofs {
            assert!(matches!(
                f.verifier.verify_proof("admin@sps.com", proof).await,
                Err(AuthError::MalformedInput(_))
            ));
        }
        assert_eq!(f.users.lookup_count(), 0);
        // Challenge untouched
        assert_eq!(f.challenges.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_wrong_proof_consumes_challenge() {
        let f = fixture();
        plant(&f.challenges, "n1", Duration::minutes(5)).await;

        let zero = "0".repeat(64);
        assert_eq!(
            f.verifier.verify_proof("admin@sps.com", &zero).await,
            Err(AuthError::InvalidCredentials)
        );

        // Even the right proof is now too late
        assert_eq!(
            f.verifier
                .verify_proof("admin@sps.com", &expected_proof("admin123", "n1").unwrap())
                .await,
            Err(AuthError::ExpiredChallenge)
        );
    }

    #[tokio::test]
    async fn test_expired_challenge_removed() {
        let f = fixture();
        plant(&f.challenges, "n1", Duration::seconds(-1)).await;

        assert_eq!(
            f.verifier
                .verify_proof("admin@sps.com", &expected_proof("admin123", "n1").unwrap())
                .await,
            Err(AuthError::ExpiredChallenge)
        );
        assert!(f.challenges.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_unknown_principal_is_invalid_credentials() {
        let f = fixture();
        assert_eq!(
            f.verifier
                .verify_proof("ghost@sps.com", &expected_proof("x", "n1").unwrap())
                .await,
            Err(AuthError::InvalidCredentials)
        );
    }
}
