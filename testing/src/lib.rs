//! # SPS Testing
//!
//! Testing utilities shared by the SPS crates.
//!
//! This crate provides:
//! - Deterministic clocks (`FixedClock`, `ManualClock`)
//! - Account fixtures and a seeded mock directory
//! - proptest strategies for secrets, nonces and emails
//!
//! ## Example
//!
//! ```
//! use sps_testing::{ManualClock, fixtures};
//! use sps_auth::environment::Clock;
//! use chrono::Duration;
//!
//! let clock = ManualClock::default();
//! let before = clock.now();
//! clock.advance(Duration::minutes(6));
//! assert_eq!(clock.now() - before, Duration::minutes(6));
//!
//! assert_eq!(fixtures::admin().email, "admin@sps.com");
//! ```

use chrono::{DateTime, Utc};
use sps_auth::environment::Clock;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use sps_testing::mocks::FixedClock;
    /// use sps_auth::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to.
    ///
    /// Clones share the same time, so a test can keep one handle and give
    /// another to the code under test.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Create a clock stopped at `time`.
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward (or back, for a negative `by`).
        pub fn advance(&self, by: chrono::Duration) {
            if let Ok(mut time) = self.time.lock() {
                *time += by;
            }
        }

        /// Jump to `time`.
        pub fn set(&self, time: DateTime<Utc>) {
            if let Ok(mut current) = self.time.lock() {
                *current = time;
            }
        }
    }

    impl Default for ManualClock {
        fn default() -> Self {
            Self::new(epoch())
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.time.lock().map_or_else(|e| *e.into_inner(), |t| *t)
        }
    }

    /// 2025-01-01 00:00:00 UTC.
    #[must_use]
    pub fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(epoch())
    }
}

/// Account fixtures.
pub mod fixtures {
    use sps_auth::mocks::MockUserRepository;
    use sps_auth::stores::json_user::default_admin;
    use sps_auth::{Principal, Role, UserId};

    /// The seeded administrator: `admin@sps.com` / `admin123`.
    #[must_use]
    pub fn admin() -> Principal {
        default_admin()
    }

    /// A regular account.
    #[must_use]
    pub fn user(id: &str, email: &str, secret: &str) -> Principal {
        Principal {
            id: UserId::from(id),
            name: format!("User {id}"),
            email: email.to_string(),
            role: Role::User,
            secret: secret.to_string(),
        }
    }

    /// `ana@sps.com` / `ana-secret`, id `2`.
    #[must_use]
    pub fn ana() -> Principal {
        user("2", "ana@sps.com", "ana-secret")
    }

    /// Mock directory holding [`admin`] and [`ana`].
    #[must_use]
    pub fn directory() -> MockUserRepository {
        MockUserRepository::with_users([admin(), ana()])
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Arbitrary non-empty secrets, including non-ASCII.
    pub fn secret() -> impl Strategy<Value = String> {
        "\\PC{1,40}"
    }

    /// Hex nonces shaped like the server's.
    pub fn nonce() -> impl Strategy<Value = String> {
        "[0-9a-f]{32}"
    }

    /// Well-formed email addresses.
    pub fn email() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9._+-]{0,15}@[a-z]{1,10}\\.(com|org|io)"
    }
}

/// Install a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`; silent by default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, ManualClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), mocks::epoch());
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::default();
        let handle = clock.clone();

        handle.advance(Duration::minutes(5));
        assert_eq!(clock.now(), mocks::epoch() + Duration::minutes(5));

        handle.set(mocks::epoch());
        assert_eq!(clock.now(), mocks::epoch());
    }

    #[test]
    fn test_directory_fixture() {
        let admin = fixtures::admin();
        assert!(admin.role.is_admin());
        assert_eq!(fixtures::ana().secret, "ana-secret");
    }
}
