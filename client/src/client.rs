//! HTTP client for the SPS authentication API.

use crate::error::{ClientError, Result};
use crate::proof::compute_proof;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sps_auth::{AuthenticatedSession, PublicUser};

/// What to do when the server has no challenge endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Never send the secret. Challenge failures are returned as is.
    #[default]
    Disabled,
    /// Retry with plaintext password login, but only when the server reports
    /// the challenge endpoint as unavailable. Network errors never trigger it.
    AllowPasswordLogin,
}

/// How a login was completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    /// Proof of knowledge over a server nonce.
    Challenge,
    /// Plaintext secret in the request body.
    Password,
}

/// Result of [`AuthClient::login`].
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Session token and account.
    pub session: AuthenticatedSession,
    /// Path that produced the session.
    pub mode: LoginMode,
}

#[derive(Deserialize)]
struct ChallengeBody {
    nonce: String,
}

#[derive(Serialize)]
struct ProofBody<'a> {
    email: &'a str,
    proof: &'a str,
}

#[derive(Serialize)]
struct PasswordBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: String,
}

/// Client for the authentication and user routes.
///
/// # Example
///
/// ```no_run
/// use sps_client::{AuthClient, FallbackPolicy};
///
/// # async fn example() -> sps_client::Result<()> {
/// let client = AuthClient::new("http://localhost:3001")
///     .with_fallback(FallbackPolicy::AllowPasswordLogin);
///
/// let outcome = client.login("admin@sps.com", "admin123").await?;
/// let users = client.list_users(&outcome.session.token).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AuthClient {
    base_url: String,
    http_client: Client,
    fallback: FallbackPolicy,
}

impl AuthClient {
    /// Create a client for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: Client::new(),
            fallback: FallbackPolicy::default(),
        }
    }

    /// Set the fallback policy.
    ///
    /// Default: [`FallbackPolicy::Disabled`]
    #[must_use]
    pub const fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Use a preconfigured `reqwest` client (timeouts, proxies, TLS roots).
    #[must_use]
    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Server base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Request a challenge nonce for `email`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::EndpointUnavailable`] if the server has no challenge route
    /// - [`ClientError::Api`] for 404 (unknown account) and other rejections
    /// - [`ClientError::Transport`] if no response was received
    pub async fn request_challenge(&self, email: &str) -> Result<String> {
        let response = self
            .http_client
            .get(self.url("/auth/challenge"))
            .query(&[("email", email)])
            .send()
            .await?;

        let body: ChallengeBody = parse(response, true).await?;
        Ok(body.nonce)
    }

    /// Log in without sending the secret.
    ///
    /// # Errors
    ///
    /// - [`ClientError::EndpointUnavailable`] if the server has no challenge route
    /// - [`ClientError::Api`] with 400 (malformed or expired challenge) or 401
    /// - [`ClientError::Proof`] if the secret cannot key the MAC
    /// - [`ClientError::Transport`] if no response was received
    pub async fn login_with_challenge(
        &self,
        email: &str,
        secret: &str,
    ) -> Result<AuthenticatedSession> {
        let nonce = self.request_challenge(email).await?;
        let proof = compute_proof(secret, &nonce)?;

        let response = self
            .http_client
            .post(self.url("/auth/login-challenge"))
            .json(&ProofBody {
                email,
                proof: &proof,
            })
            .send()
            .await?;

        parse(response, true).await
    }

    /// Log in by sending the plaintext secret.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] with 401 for bad credentials, or 404 if the
    ///   server has password login disabled
    /// - [`ClientError::Transport`] if no response was received
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedSession> {
        let response = self
            .http_client
            .post(self.url("/auth/login"))
            .json(&PasswordBody { email, password })
            .send()
            .await?;

        parse(response, false).await
    }

    /// Log in with the challenge flow, falling back to password login only
    /// if the policy allows it and the server lacks the challenge endpoint.
    ///
    /// # Errors
    ///
    /// Returns the challenge error unless a fallback happened, in which case
    /// the password login error is returned.
    pub async fn login(&self, email: &str, secret: &str) -> Result<LoginOutcome> {
        match self.login_with_challenge(email, secret).await {
            Ok(session) => Ok(LoginOutcome {
                session,
                mode: LoginMode::Challenge,
            }),
            Err(ClientError::EndpointUnavailable { status })
                if self.fallback == FallbackPolicy::AllowPasswordLogin =>
            {
                tracing::warn!(
                    status,
                    server = %self.base_url,
                    "Challenge login unavailable; falling back to password login, secret will be sent to the server"
                );
                let session = self.login_with_password(email, secret).await?;
                Ok(LoginOutcome {
                    session,
                    mode: LoginMode::Password,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// List accounts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with 401 for a missing or expired token.
    pub async fn list_users(&self, token: &str) -> Result<Vec<PublicUser>> {
        let response = self
            .http_client
            .get(self.url("/users"))
            .bearer_auth(token)
            .send()
            .await?;

        parse(response, false).await
    }
}

/// Decode a success body or turn the response into an error.
///
/// With `detect_unavailable`, 405, 501 and a 404 that carries no error body
/// are reported as [`ClientError::EndpointUnavailable`].
async fn parse<T: DeserializeOwned>(response: Response, detect_unavailable: bool) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()));
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ErrorBody>(&text).ok();

    if detect_unavailable {
        let unavailable = match status {
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED => true,
            StatusCode::NOT_FOUND => body.is_none(),
            _ => false,
        };
        if unavailable {
            return Err(ClientError::EndpointUnavailable {
                status: status.as_u16(),
            });
        }
    }

    let (code, message) = match body {
        Some(ErrorBody { code, message }) => (code, message),
        None if text.is_empty() => (None, status.to_string()),
        None => (None, text),
    };

    tracing::debug!(status = status.as_u16(), ?code, %message, "Request rejected");

    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}
