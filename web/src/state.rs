//! Application state for Axum handlers.

use crate::config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use sps_auth::environment::{Clock, SystemClock};
use sps_auth::providers::UserRepository;
use sps_auth::stores::{InMemoryChallengeStore, InMemoryRateLimiter};
use sps_auth::{AccountService, ChallengeIssuer, PasswordLogin, ProofVerifier, TokenService};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloning is cheap: every service sits behind an `Arc`. The issuer and the
/// verifier share one challenge table.
pub struct AppState<U> {
    /// Challenge issuance.
    pub issuer: Arc<ChallengeIssuer<U, InMemoryChallengeStore>>,
    /// Challenge redemption.
    pub verifier: Arc<ProofVerifier<U, InMemoryChallengeStore>>,
    /// Plaintext password login.
    pub password_login: Arc<PasswordLogin<U>>,
    /// Account management.
    pub accounts: Arc<AccountService<U>>,
    /// Token signing and verification.
    pub tokens: Arc<TokenService>,
    /// Per-client request budget for `/auth` routes.
    pub rate_limiter: Arc<InMemoryRateLimiter>,
    /// Identify clients by forwarding headers instead of the socket address.
    pub trust_proxy: bool,
    /// Prometheus handle, when metrics are exported.
    pub metrics: Option<PrometheusHandle>,
}

impl<U> Clone for AppState<U> {
    fn clone(&self) -> Self {
        Self {
            issuer: Arc::clone(&self.issuer),
            verifier: Arc::clone(&self.verifier),
            password_login: Arc::clone(&self.password_login),
            accounts: Arc::clone(&self.accounts),
            tokens: Arc::clone(&self.tokens),
            rate_limiter: Arc::clone(&self.rate_limiter),
            trust_proxy: self.trust_proxy,
            metrics: self.metrics.clone(),
        }
    }
}

impl<U: UserRepository + 'static> AppState<U> {
    /// Wire every service over `users` using the wall clock.
    #[must_use]
    pub fn new(users: Arc<U>, config: &Config) -> Self {
        Self::with_clock(users, config, Arc::new(SystemClock))
    }

    /// Wire every service over `users` using `clock`.
    #[must_use]
    pub fn with_clock(users: Arc<U>, config: &Config, clock: Arc<dyn Clock>) -> Self {
        let auth = &config.auth;
        let challenges = Arc::new(InMemoryChallengeStore::new());
        let tokens = Arc::new(TokenService::new(auth.token.clone(), Arc::clone(&clock)));

        let issuer = ChallengeIssuer::new(
            Arc::clone(&users),
            Arc::clone(&challenges),
            Arc::clone(&clock),
            auth.challenge.clone(),
        );
        let verifier =
            ProofVerifier::new(Arc::clone(&users), challenges, Arc::clone(&tokens), clock);
        let password_login = PasswordLogin::new(Arc::clone(&users), Arc::clone(&tokens))
            .with_enabled(auth.password_login);
        let accounts = AccountService::new(users, auth.accounts.clone());

        Self {
            issuer: Arc::new(issuer),
            verifier: Arc::new(verifier),
            password_login: Arc::new(password_login),
            accounts: Arc::new(accounts),
            tokens,
            rate_limiter: Arc::new(InMemoryRateLimiter::new(
                auth.rate_limit.max_requests,
                auth.rate_limit.window,
            )),
            trust_proxy: config.server.trust_proxy,
            metrics: None,
        }
    }

    /// Serve `handle` on `/metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
