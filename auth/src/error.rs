//! Error types for authentication and account operations.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for the authentication core.
///
/// Variants are grouped by the stage that produces them. The HTTP shell maps
/// each one to a status code; see `sps-web`'s `AppError`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Challenge-Response Errors
    // ═══════════════════════════════════════════════════════════

    /// Request input failed shape checks (empty principal, bad proof encoding).
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Principal is unknown at challenge time.
    #[error("User not found")]
    NotFound,

    /// Wrong proof, wrong password, or unknown principal at login time.
    ///
    /// The last two are merged on purpose so that login does not reveal
    /// which accounts exist.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No outstanding challenge for the principal, or it expired.
    #[error("Challenge expired")]
    ExpiredChallenge,

    // ═══════════════════════════════════════════════════════════
    // Session Errors
    // ═══════════════════════════════════════════════════════════

    /// Session token failed verification.
    ///
    /// Bad signature, malformed structure and expiry all collapse into this
    /// single variant.
    #[error("Not authenticated")]
    InvalidToken,

    // ═══════════════════════════════════════════════════════════
    // Authorization Errors
    // ═══════════════════════════════════════════════════════════

    /// Caller lacks the role or ownership required for the operation.
    #[error("Insufficient permissions: {required}")]
    InsufficientPermissions {
        /// Required permission that was missing
        required: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Account Errors
    // ═══════════════════════════════════════════════════════════

    /// Requested account does not exist.
    #[error("User not found")]
    ResourceNotFound,

    /// Another account already uses this email.
    #[error("Email already registered")]
    EmailTaken,

    /// Account field failed validation.
    #[error("Invalid data: {0}")]
    Validation(String),

    /// The account is protected from deletion.
    #[error("The administrator account cannot be deleted")]
    ProtectedAccount,

    // ═══════════════════════════════════════════════════════════
    // Rate Limiting
    // ═══════════════════════════════════════════════════════════

    /// Too many authentication attempts.
    #[error("Too many attempts, please retry after {retry_after:?}")]
    TooManyAttempts {
        /// Duration to wait before retrying
        retry_after: std::time::Duration,
    },

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Backing store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error (should not be exposed to users).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns `true` if this error should be surfaced in security logs.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sps_auth::AuthError;
    /// assert!(AuthError::InvalidCredentials.is_security_issue());
    /// assert!(!AuthError::EmailTaken.is_security_issue());
    /// ```
    #[must_use]
    pub const fn is_security_issue(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::InvalidToken
                | Self::InsufficientPermissions { .. }
                | Self::TooManyAttempts { .. }
        )
    }

    /// Shorthand for [`AuthError::InsufficientPermissions`].
    #[must_use]
    pub fn forbidden(required: impl Into<String>) -> Self {
        Self::InsufficientPermissions {
            required: required.into(),
        }
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
