//! JSON-file user directory.
//!
//! The file holds a single object, `{ "users": [...] }`. Every write
//! rewrites the whole file; reads are served from an in-memory copy loaded
//! at open time.
//!
//! Loading is lenient. A file that is not JSON is replaced with the default
//! directory. Valid JSON without a `users` array is served as the default
//! directory but left on disk until the first write. Individual records
//! that do not decode are skipped with a warning and written back verbatim,
//! so no stored account is lost.
//!
//! # Example
//!
//! ```no_run
//! use sps_auth::stores::JsonFileUserRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let users = JsonFileUserRepository::open("db.json").await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::providers::UserRepository;
use crate::state::{Principal, Role, UserId};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Email of the account seeded into a fresh directory.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@sps.com";

/// File contents as found at open time.
enum Loaded {
    /// A `users` array; `unreadable` holds records that did not decode.
    Users {
        users: Vec<Principal>,
        unreadable: Vec<Value>,
    },
    /// Valid JSON without a `users` array.
    NoUsers,
    /// Not JSON at all.
    Corrupt(serde_json::Error),
}

fn load(contents: &str) -> Loaded {
    let document: Value = match serde_json::from_str(contents) {
        Ok(document) => document,
        Err(e) => return Loaded::Corrupt(e),
    };

    let Some(records) = document.get("users").and_then(Value::as_array) else {
        return Loaded::NoUsers;
    };

    let mut users = Vec::with_capacity(records.len());
    let mut unreadable = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match serde_json::from_value::<Principal>(record.clone()) {
            Ok(principal) => users.push(principal),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable user record");
                unreadable.push(record.clone());
            }
        }
    }

    Loaded::Users { users, unreadable }
}

/// The administrator account written to a new or unreadable directory.
#[must_use]
pub fn default_admin() -> Principal {
    Principal {
        id: UserId::from("1"),
        name: "Admin User".to_string(),
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        role: Role::Admin,
        secret: "admin123".to_string(),
    }
}

/// User directory persisted to a JSON file.
///
/// Clones share the same cache and file.
#[derive(Debug, Clone)]
pub struct JsonFileUserRepository {
    path: Arc<PathBuf>,
    /// Write lock is held across the file write so writers are serialized.
    cache: Arc<RwLock<Vec<Principal>>>,
    /// Records that did not decode at open time, preserved on every write.
    unreadable: Arc<Vec<Value>>,
}

impl JsonFileUserRepository {
    /// Open the directory at `path`.
    ///
    /// A missing file or a file that is not JSON is written with the default
    /// administrator. See the module docs for partially readable files.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the file cannot be read or written.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let (users, unreadable) = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match load(&contents) {
                Loaded::Users { users, unreadable } => (users, unreadable),
                Loaded::NoUsers => {
                    tracing::warn!(
                        path = %path.display(),
                        "User directory has no users array, serving the default"
                    );
                    (vec![default_admin()], Vec::new())
                }
                Loaded::Corrupt(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "User directory is not valid JSON, resetting to default"
                    );
                    let users = vec![default_admin()];
                    write_database(&path, &users, &[]).await?;
                    (users, Vec::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "Creating user directory");
                let users = vec![default_admin()];
                write_database(&path, &users, &[]).await?;
                (users, Vec::new())
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            path = %path.display(),
            users = users.len(),
            unreadable = unreadable.len(),
            "User directory loaded"
        );

        Ok(Self {
            path: Arc::new(path),
            cache: Arc::new(RwLock::new(users)),
            unreadable: Arc::new(unreadable),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the directory, persist it, then commit.
    ///
    /// The cache is left untouched if either step fails.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Vec<Principal>) -> Result<T> + Send,
    ) -> Result<T> {
        let mut cache = self.cache.write().await;
        let mut users = cache.clone();
        let output = change(&mut users)?;

        write_database(&self.path, &users, &self.unreadable).await?;
        *cache = users;

        Ok(output)
    }
}

async fn write_database(path: &Path, users: &[Principal], unreadable: &[Value]) -> Result<()> {
    let encode =
        |e: serde_json::Error| AuthError::Storage(format!("Failed to encode user directory: {e}"));

    let mut records = users
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(encode)?;
    records.extend(unreadable.iter().cloned());

    let json = serde_json::to_string_pretty(&serde_json::json!({ "users": records }))
        .map_err(encode)?;

    // Write-then-rename keeps the old file intact if the write fails midway.
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn email_in_use(users: &[Principal], email: &str, except: Option<&UserId>) -> bool {
    users
        .iter()
        .any(|u| u.email == email && Some(&u.id) != except)
}

impl UserRepository for JsonFileUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>> {
        Ok(self
            .cache
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Principal>> {
        Ok(self.cache.read().await.iter().find(|u| &u.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Principal>> {
        Ok(self.cache.read().await.clone())
    }

    async fn insert(&self, principal: Principal) -> Result<Principal> {
        self.mutate(move |users| {
            if email_in_use(users, &principal.email, None) {
                return Err(AuthError::EmailTaken);
            }
            users.push(principal.clone());
            Ok(principal)
        })
        .await
    }

    async fn replace(&self, principal: Principal) -> Result<Principal> {
        self.mutate(move |users| {
            if email_in_use(users, &principal.email, Some(&principal.id)) {
                return Err(AuthError::EmailTaken);
            }
            let slot = users
                .iter_mut()
                .find(|u| u.id == principal.id)
                .ok_or(AuthError::ResourceNotFound)?;
            *slot = principal.clone();
            Ok(principal)
        })
        .await
    }

    async fn remove(&self, id: &UserId) -> Result<()> {
        let id = id.clone();
        self.mutate(move |users| {
            let before = users.len();
            users.retain(|u| u.id != id);
            if users.len() == before {
                return Err(AuthError::ResourceNotFound);
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn ana() -> Principal {
        Principal {
            id: UserId::from("2"),
            name: "Ana".to_string(),
            email: "ana@sps.com".to_string(),
            role: Role::User,
            secret: "abcd".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_seeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let repo = JsonFileUserRepository::open(&path).await.unwrap();
        let admin = repo.find_by_email(DEFAULT_ADMIN_EMAIL).await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.secret, "admin123");

        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["users"][0]["email"], DEFAULT_ADMIN_EMAIL);
        assert_eq!(on_disk["users"][0]["type"], "admin");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "{ not json").unwrap();

        let repo = JsonFileUserRepository::open(&path).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 1);

        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["users"][0]["email"], DEFAULT_ADMIN_EMAIL);
    }

    #[tokio::test]
    async fn test_missing_users_array_serves_default_without_rewriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, r#"{"people": []}"#).unwrap();

        let repo = JsonFileUserRepository::open(&path).await.unwrap();
        assert!(repo.find_by_email(DEFAULT_ADMIN_EMAIL).await.unwrap().is_some());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"people": []}"#);
    }

    #[tokio::test]
    async fn test_numeric_id_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let db = serde_json::json!({ "users": [
            { "id": "1", "name": "Admin User", "email": "admin@sps.com", "type": "admin", "password": "admin123" },
            { "id": 2, "name": "Ana", "email": "ana@sps.com", "type": "user", "password": "abcd" },
            { "id": "3", "name": "Bo", "email": "bo@sps.com", "type": "user", "password": "bo-secret" },
        ]});
        std::fs::write(&path, db.to_string()).unwrap();

        let repo = JsonFileUserRepository::open(&path).await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 3);
        let ana = repo.find_by_id(&UserId::from("2")).await.unwrap().unwrap();
        assert_eq!(ana.email, "ana@sps.com");
        assert!(std::fs::read_to_string(&path).unwrap().contains("bo@sps.com"));
    }

    #[tokio::test]
    async fn test_unreadable_record_is_skipped_and_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let odd = serde_json::json!({ "id": "7", "email": "odd@sps.com", "type": "root" });
        let db = serde_json::json!({ "users": [
            { "id": "1", "name": "Admin User", "email": "admin@sps.com", "type": "admin", "password": "admin123" },
            odd.clone(),
        ]});
        std::fs::write(&path, db.to_string()).unwrap();

        let repo = JsonFileUserRepository::open(&path).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 1);
        assert!(repo.find_by_email("odd@sps.com").await.unwrap().is_none());

        repo.insert(ana()).await.unwrap();

        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let records = on_disk["users"].as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.contains(&odd));
        assert!(records.iter().any(|r| r["email"] == "ana@sps.com"));
    }

    #[tokio::test]
    async fn test_writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let repo = JsonFileUserRepository::open(&path).await.unwrap();
        repo.insert(ana()).await.unwrap();

        let mut renamed = ana();
        renamed.name = "Ana Maria".to_string();
        repo.replace(renamed).await.unwrap();

        let reopened = JsonFileUserRepository::open(&path).await.unwrap();
        let stored = reopened.find_by_id(&UserId::from("2")).await.unwrap().unwrap();
        assert_eq!(stored.name, "Ana Maria");

        reopened.remove(&UserId::from("2")).await.unwrap();
        let again = JsonFileUserRepository::open(&path).await.unwrap();
        assert_eq!(again.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileUserRepository::open(dir.path().join("db.json"))
            .await
            .unwrap();

        repo.insert(ana()).await.unwrap();
        let mut dup = ana();
        dup.id = UserId::from("3");
        assert_eq!(repo.insert(dup).await, Err(AuthError::EmailTaken));

        // Taking the admin's email on update is also rejected
        let mut clash = ana();
        clash.email = DEFAULT_ADMIN_EMAIL.to_string();
        assert_eq!(repo.replace(clash).await, Err(AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileUserRepository::open(dir.path().join("db.json"))
            .await
            .unwrap();

        assert_eq!(repo.remove(&UserId::from("99")).await, Err(AuthError::ResourceNotFound));
        let mut ghost = ana();
        ghost.id = UserId::from("99");
        assert_eq!(repo.replace(ghost).await, Err(AuthError::ResourceNotFound));
    }
}
