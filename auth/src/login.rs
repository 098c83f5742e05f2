//! Direct password login.
//!
//! The secret travels in the request body on this path. It exists for
//! clients that cannot run the challenge flow and can be switched off in
//! configuration.

use crate::error::{AuthError, Result};
use crate::providers::UserRepository;
use crate::state::AuthenticatedSession;
use crate::token::TokenService;
use constant_time_eq::constant_time_eq;
use std::sync::Arc;

/// Email and password login.
pub struct PasswordLogin<U> {
    users: Arc<U>,
    tokens: Arc<TokenService>,
    enabled: bool,
}

impl<U: UserRepository> PasswordLogin<U> {
    /// Create the password login path.
    #[must_use]
    pub fn new(users: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self {
            users,
            tokens,
            enabled: true,
        }
    }

    /// Enable or disable the path.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns `true` if password login is accepted.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Authenticate with `email` and plaintext `password`.
    ///
    /// # Errors
    ///
    /// - `AuthError::MalformedInput` if either field is empty
    /// - `AuthError::InvalidCredentials` for an unknown email or wrong password
    /// - `AuthError::ResourceNotFound` if the path is disabled
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedSession> {
        if !self.enabled {
            return Err(AuthError::ResourceNotFound);
        }
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MalformedInput(
                "email and password are required".to_string(),
            ));
        }

        let account = self.users.find_by_email(email).await?;
        let matched = account
            .as_ref()
            .is_some_and(|a| constant_time_eq(a.secret.as_bytes(), password.as_bytes()));

        let Some(account) = account.filter(|_| matched) else {
            tracing::warn!(principal = %email, "Password login failed");
            metrics::counter!("auth_logins_failed_total", "mode" => "password").increment(1);
            return Err(AuthError::InvalidCredentials);
        };

        let token = self.tokens.issue(&account)?;

        tracing::warn!(
            principal = %email,
            user_id = %account.id,
            "Password login succeeded; secret was sent over the wire"
        );
        metrics::counter!("auth_logins_total", "mode" => "password").increment(1);

        Ok(AuthenticatedSession {
            token,
            user: account.to_public(),
        })
    }
}
