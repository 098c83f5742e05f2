//! Mock provider implementations for testing.
//!
//! Simple in-memory implementations for unit and integration tests. The
//! in-memory challenge store and rate limiter in [`crate::stores`] are
//! production types and are used directly in tests.

pub mod user;

pub use user::MockUserRepository;
