//! Account management.
//!
//! CRUD over the user directory with field validation, role rules and the
//! protected administrator account.

use crate::authz::Actor;
use crate::config::AccountPolicy;
use crate::error::{AuthError, Result};
use crate::providers::UserRepository;
use crate::state::{Principal, PublicUser, Role, UserId};
use crate::utils::{validate_email, validate_name, validate_password};
use serde::Deserialize;
use std::sync::Arc;

/// Fields for a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Role, `user` when absent.
    #[serde(rename = "type", default)]
    pub role: Option<Role>,
    /// Initial secret.
    pub password: String,
}

/// Partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountChanges {
    /// New display name.
    pub name: Option<String>,
    /// New login email.
    pub email: Option<String>,
    /// New role (admin only).
    #[serde(rename = "type")]
    pub role: Option<Role>,
    /// New secret. An empty string keeps the current one.
    pub password: Option<String>,
}

/// Account management service.
pub struct AccountService<U> {
    users: Arc<U>,
    policy: AccountPolicy,
}

impl<U: UserRepository> AccountService<U> {
    /// Create the service.
    #[must_use]
    pub const fn new(users: Arc<U>, policy: AccountPolicy) -> Self {
        Self { users, policy }
    }

    /// All accounts without secrets.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the directory.
    pub async fn list(&self) -> Result<Vec<PublicUser>> {
        Ok(self.users.list().await?.iter().map(PublicUser::from).collect())
    }

    /// One account without its secret.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ResourceNotFound` for an unknown id.
    pub async fn get(&self, id: &UserId) -> Result<PublicUser> {
        self.find(id).await.map(|p| p.to_public())
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// - `AuthError::Validation` for bad fields
    /// - `AuthError::InsufficientPermissions` if a non-admin creates an admin
    /// - `AuthError::EmailTaken` for a duplicate email
    pub async fn create(&self, actor: &Actor, account: NewAccount) -> Result<PublicUser> {
        validate_name(&account.name)?;
        validate_email(&account.email)?;
        validate_password(&account.password)?;

        let role = account.role.unwrap_or_default();
        if role.is_admin() {
            actor.require_admin()?;
        }

        let created = self
            .users
            .insert(Principal {
                id: UserId::new(),
                name: account.name,
                email: account.email,
                role,
                secret: account.password,
            })
            .await?;

        tracing::info!(
            actor = %actor.id,
            user_id = %created.id,
            role = %created.role,
            "Account created"
        );
        metrics::counter!("accounts_created_total").increment(1);

        Ok(created.to_public())
    }

    /// Apply `changes` to account `id`.
    ///
    /// # Errors
    ///
    /// - `AuthError::InsufficientPermissions` unless the caller is the account
    ///   itself or an admin, or if a non-admin changes a role
    /// - `AuthError::ResourceNotFound` for an unknown id
    /// - `AuthError::Validation` for bad fields
    /// - `AuthError::EmailTaken` if the new email belongs to another account
    pub async fn update(
        &self,
        actor: &Actor,
        id: &UserId,
        changes: AccountChanges,
    ) -> Result<PublicUser> {
        actor.require_manage(id)?;
        let mut account = self.find(id).await?;

        if let Some(role) = changes.role.filter(|r| *r != account.role) {
            actor.require_admin()?;
            account.role = role;
        }
        if let Some(name) = changes.name {
            validate_name(&name)?;
            account.name = name;
        }
        if let Some(email) = changes.email {
            validate_email(&email)?;
            account.email = email;
        }
        if let Some(password) = changes.password.filter(|p| !p.is_empty()) {
            validate_password(&password)?;
            account.secret = password;
        }

        let updated = self.users.replace(account).await?;

        tracing::info!(actor = %actor.id, user_id = %updated.id, "Account updated");
        metrics::counter!("accounts_updated_total").increment(1);

        Ok(updated.to_public())
    }

    /// Delete account `id`.
    ///
    /// # Errors
    ///
    /// - `AuthError::InsufficientPermissions` unless the caller is the account
    ///   itself or an admin
    /// - `AuthError::ResourceNotFound` for an unknown id
    /// - `AuthError::ProtectedAccount` for the protected administrator
    pub async fn delete(&self, actor: &Actor, id: &UserId) -> Result<()> {
        actor.require_manage(id)?;
        let account = self.find(id).await?;

        if account.email == self.policy.protected_email {
            tracing::warn!(actor = %actor.id, user_id = %id, "Refused to delete protected account");
            return Err(AuthError::ProtectedAccount);
        }

        self.users.remove(id).await?;

        tracing::info!(actor = %actor.id, user_id = %id, "Account deleted");
        metrics::counter!("accounts_deleted_total").increment(1);

        Ok(())
    }

    async fn find(&self, id: &UserId) -> Result<Principal> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AuthError::ResourceNotFound)
    }
}
