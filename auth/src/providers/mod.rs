//! Authentication providers.
//!
//! Traits for every collaborator the auth services depend on. Services are
//! generic over these so the same logic runs against the JSON directory in
//! production and against in-memory mocks in tests.
//!
//! ```text
//! ┌──────────────────┐      ┌──────────────────┐
//! │ ChallengeIssuer  │      │ ProofVerifier    │
//! └───┬──────────┬───┘      └───┬──────────┬───┘
//!     │          │              │          │
//!     ▼          ▼              ▼          ▼
//! UserRepository    ChallengeStore    (TokenService)
//! ```

pub mod challenge_store;
pub mod rate_limiter;
pub mod user;

pub use challenge_store::{Challenge, ChallengeStore};
pub use rate_limiter::RateLimiter;
pub use user::UserRepository;
