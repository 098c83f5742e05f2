//! Mock user repository for testing.

use crate::error::{AuthError, Result};
use crate::providers::UserRepository;
use crate::state::{Principal, UserId};
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock user repository.
///
/// Uses in-memory storage for testing. Tracks how many lookups were made so
/// tests can assert that a request was rejected before touching the
/// directory.
#[derive(Debug, Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<Principal>>>,
    lookups: Arc<Mutex<usize>>,
}

impl MockUserRepository {
    /// Create an empty mock user repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `users`.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = Principal>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users.into_iter().collect())),
            lookups: Arc::default(),
        }
    }

    /// Number of `find_by_email` / `find_by_id` calls so far.
    #[must_use]
    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().map_or(0, |n| *n)
    }

    fn count_lookup(lookups: &Mutex<usize>) -> Result<()> {
        *lookups.lock().map_err(|_| AuthError::Internal("Mutex lock failed".into()))? += 1;
        Ok(())
    }
}

impl UserRepository for MockUserRepository {
    fn find_by_email(&self, email: &str) -> impl Future<Output = Result<Option<Principal>>> + Send {
        let users = Arc::clone(&self.users);
        let lookups = Arc::clone(&self.lookups);
        let email = email.to_string();

        async move {
            Self::count_lookup(&lookups)?;
            Ok(users
                .lock()
                .map_err(|_| AuthError::Internal("Mutex lock failed".into()))?
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }
    }

    fn find_by_id(&self, id: &UserId) -> impl Future<Output = Result<Option<Principal>>> + Send {
        let users = Arc::clone(&self.users);
        let lookups = Arc::clone(&self.lookups);
        let id = id.clone();

        async move {
            Self::count_lookup(&lookups)?;
            Ok(users
                .lock()
                .map_err(|_| AuthError::Internal("Mutex lock failed".into()))?
                .iter()
                .find(|u| u.id == id)
                .cloned())
        }
    }

    fn list(&self) -> impl Future<Output = Result<Vec<Principal>>> + Send {
        let users = Arc::clone(&self.users);

        async move {
            Ok(users
                .lock()
                .map_err(|_| AuthError::Internal("Mutex lock failed".into()))?
                .clone())
        }
    }

    fn insert(&self, principal: Principal) -> impl Future<Output = Result<Principal>> + Send {
        let users = Arc::clone(&self.users);

        async move {
            let mut guard = users
                .lock()
                .map_err(|_| AuthError::Internal("Mutex lock failed".into()))?;

            if guard.iter().any(|u| u.email == principal.email) {
                return Err(AuthError::EmailTaken);
            }

            guard.push(principal.clone());
            Ok(principal)
        }
    }

    fn replace(&self, principal: Principal) -> impl Future<Output = Result<Principal>> + Send {
        let users = Arc::clone(&self.users);

        async move {
            let mut guard = users
                .lock()
                .map_err(|_| AuthError::Internal("Mutex lock failed".into()))?;

            if guard
                .iter()
                .any(|u| u.email == principal.email && u.id != principal.id)
            {
                return Err(AuthError::EmailTaken);
            }

            let slot = guard
                .iter_mut()
                .find(|u| u.id == principal.id)
                .ok_or(AuthError::ResourceNotFound)?;
            *slot = principal.clone();
            Ok(principal)
        }
    }

    fn remove(&self, id: &UserId) -> impl Future<Output = Result<()>> + Send {
        let users = Arc::clone(&self.users);
        let id = id.clone();

        async move {
            let mut guard = users
                .lock()
                .map_err(|_| AuthError::Internal("Mutex lock failed".into()))?;

            let before = guard.len();
            guard.retain(|u| u.id != id);
            if guard.len() == before {
                return Err(AuthError::ResourceNotFound);
            }
            Ok(())
        }
    }
}
