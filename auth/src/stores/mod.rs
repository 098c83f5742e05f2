//! Storage implementations for the auth system.
//!
//! - **Challenge Store** (memory) - process-local challenge table with atomic take
//! - **User Directory** (JSON file) - whole-file persistence with an in-memory cache
//! - **Rate Limiter** (memory) - sliding window per client key

pub mod json_user;
pub mod memory_challenge;
pub mod memory_rate_limiter;

// Re-exports
pub use json_user::JsonFileUserRepository;
pub use memory_challenge::InMemoryChallengeStore;
pub use memory_rate_limiter::InMemoryRateLimiter;
