//! Core domain types.
//!
//! Wire names follow the JSON the user directory has always stored:
//! the role is serialized as `type` and the secret as `password`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for a user account.
///
/// Stored as an opaque string so that legacy identifiers (`"1"`) and
/// generated UUIDs coexist in the same directory. Numeric ids written by
/// hand (`2`) are read as their decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(id) => Self(id),
            Raw::Number(id) => Self(id.to_string()),
        })
    }
}

impl UserId {
    /// Generate a new random `UserId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Principal
// ═══════════════════════════════════════════════════════════════════════

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including role changes on other accounts.
    Admin,
    /// Regular account.
    #[default]
    User,
}

impl Role {
    /// Returns `true` for [`Role::Admin`].
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored account, secret included.
///
/// The secret is kept in plaintext because the challenge-response proof is
/// keyed by it directly. Never serialize this type into a response; use
/// [`PublicUser`] instead.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Account identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login identifier.
    pub email: String,
    /// Account role.
    #[serde(rename = "type", default)]
    pub role: Role,
    /// Shared secret.
    #[serde(rename = "password")]
    pub secret: String,
}

impl Principal {
    /// Secret-free view of this account.
    #[must_use]
    pub fn to_public(&self) -> PublicUser {
        PublicUser::from(self)
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Account as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    /// Account identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login identifier.
    pub email: String,
    /// Account role.
    #[serde(rename = "type")]
    pub role: Role,
}

impl From<&Principal> for PublicUser {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id.clone(),
            name: principal.name.clone(),
            email: principal.email.clone(),
            role: principal.role,
        }
    }
}

/// Result of a successful login on either path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedSession {
    /// Signed session token.
    pub token: String,
    /// The authenticated account.
    pub user: PublicUser,
}
