//! Authorization rules for account management.
//!
//! Every rule reads only the verified token claims of the caller.

use crate::error::{AuthError, Result};
use crate::state::{Role, UserId};
use crate::token::Claims;

/// The caller of a protected operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Caller's account id.
    pub id: UserId,
    /// Caller's role as carried by the token.
    pub role: Role,
}

impl From<&Claims> for Actor {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.id.clone(),
            role: claims.role,
        }
    }
}

impl Actor {
    /// Returns `true` if the caller may modify or delete `target`.
    #[must_use]
    pub fn can_manage(&self, target: &UserId) -> bool {
        self.role.is_admin() || &self.id == target
    }

    /// Require [`Actor::can_manage`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InsufficientPermissions` otherwise.
    pub fn require_manage(&self, target: &UserId) -> Result<()> {
        if self.can_manage(target) {
            Ok(())
        } else {
            Err(AuthError::forbidden("account owner or admin"))
        }
    }

    /// Require the admin role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InsufficientPermissions` otherwise.
    pub fn require_admin(&self) -> Result<()> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AuthError::forbidden("admin"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: &str, role: Role) -> Actor {
        Actor {
            id: UserId::from(id),
            role,
        }
    }

    #[test]
    fn test_admin_manages_anyone() {
        let admin = actor("1", Role::Admin);
        assert!(admin.can_manage(&UserId::from("2")));
        assert!(admin.require_admin().is_ok());
    }

    #[test]
    fn test_user_manages_only_self() {
        let user = actor("2", Role::User);
        assert!(user.require_manage(&UserId::from("2")).is_ok());
        assert!(matches!(
            user.require_manage(&UserId::from("3")),
            Err(AuthError::InsufficientPermissions { .. })
        ));
        assert!(user.require_admin().is_err());
    }
}
