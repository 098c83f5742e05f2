//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors returned by [`AuthClient`](crate::AuthClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection, DNS, TLS, timeout).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server does not offer this endpoint.
    ///
    /// Reported for 405, 501, or a 404 without an error body.
    #[error("Endpoint not available (HTTP {status})")]
    EndpointUnavailable {
        /// HTTP status returned.
        status: u16,
    },

    /// The server rejected the request.
    #[error("HTTP {status}: {message}")]
    Api {
        /// HTTP status returned.
        status: u16,
        /// Machine-readable code from the error body, if any.
        code: Option<String>,
        /// Message from the error body.
        message: String,
    },

    /// A successful response had an unexpected body.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The secret could not be used to derive a proof.
    #[error("Failed to derive proof: {0}")]
    Proof(String),
}

impl ClientError {
    /// HTTP status of the response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::EndpointUnavailable { status } | Self::Api { status, .. } => Some(*status),
            Self::Transport(_) | Self::InvalidResponse(_) | Self::Proof(_) => None,
        }
    }

    /// Machine-readable error code from the server, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` for a rejected credential or token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}
