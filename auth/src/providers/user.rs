//! User repository trait.

use crate::error::Result;
use crate::state::{Principal, UserId};
use std::future::Future;

/// User directory.
///
/// Lookups return `Ok(None)` for unknown accounts; callers decide which
/// error that becomes (the challenge issuer and the verifier disagree on
/// purpose).
pub trait UserRepository: Send + Sync {
    /// Find an account by its login email (exact match).
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be read.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Principal>>> + Send;

    /// Find an account by identifier.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be read.
    fn find_by_id(
        &self,
        id: &UserId,
    ) -> impl Future<Output = Result<Option<Principal>>> + Send;

    /// All accounts, in storage order.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be read.
    fn list(&self) -> impl Future<Output = Result<Vec<Principal>>> + Send;

    /// Add a new account.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Email already registered → `AuthError::EmailTaken`
    /// - Write fails → `AuthError::Storage`
    fn insert(
        &self,
        principal: Principal,
    ) -> impl Future<Output = Result<Principal>> + Send;

    /// Replace the account with the same id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No such account → `AuthError::ResourceNotFound`
    /// - New email belongs to another account → `AuthError::EmailTaken`
    /// - Write fails → `AuthError::Storage`
    fn replace(
        &self,
        principal: Principal,
    ) -> impl Future<Output = Result<Principal>> + Send;

    /// Remove an account.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No such account → `AuthError::ResourceNotFound`
    /// - Write fails → `AuthError::Storage`
    fn remove(&self, id: &UserId) -> impl Future<Output = Result<()>> + Send;
}
