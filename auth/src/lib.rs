//! # SPS Authentication
//!
//! Challenge-response login, session tokens and account management for the
//! SPS user directory.
//!
//! ## Features
//!
//! - **Proof of knowledge**: the client proves it knows the secret with
//!   `HMAC-SHA256(secret, nonce)`; the secret never crosses the wire
//! - **Single-use nonces**: each challenge is taken atomically on redemption
//! - **Stateless sessions**: HS256 tokens carrying id, email, role and name
//! - **Testable**: every collaborator is a trait with an in-memory mock
//!
//! ## Flow
//!
//! ```text
//! client                        ChallengeIssuer       ProofVerifier
//!   │ issue_challenge(email) ──────────►│                   │
//!   │◄──────────────── nonce ───────────│ store(email,nonce)│
//!   │ proof = HMAC(secret, nonce)       │                   │
//!   │ verify_proof(email, proof) ───────────────────────────►│ take(email)
//!   │◄──────────────────────────── token + public user ──────│
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sps_auth::mocks::MockUserRepository;
//! use sps_auth::stores::{InMemoryChallengeStore, json_user::default_admin};
//! use sps_auth::{ChallengeIssuer, ProofVerifier, TokenService, proof};
//! use sps_auth::config::{ChallengeConfig, TokenConfig};
//! use sps_auth::environment::{Clock, SystemClock};
//! use std::sync::Arc;
//!
//! # async fn example() -> sps_auth::Result<()> {
//! let users = Arc::new(MockUserRepository::with_users([default_admin()]));
//! let challenges = Arc::new(InMemoryChallengeStore::new());
//! let clock: Arc<dyn Clock> = Arc::new(SystemClock);
//! let tokens = Arc::new(TokenService::new(TokenConfig::default(), Arc::clone(&clock)));
//!
//! let issuer = ChallengeIssuer::new(
//!     Arc::clone(&users),
//!     Arc::clone(&challenges),
//!     Arc::clone(&clock),
//!     ChallengeConfig::default(),
//! );
//! let verifier = ProofVerifier::new(users, challenges, tokens, clock);
//!
//! let nonce = issuer.issue_challenge("admin@sps.com").await?;
//! let session = verifier
//!     .verify_proof("admin@sps.com", &proof::expected_proof("admin123", &nonce)?)
//!     .await?;
//! assert_eq!(session.user.email, "admin@sps.com");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod accounts;
pub mod authz;
pub mod challenge;
pub mod config;
pub mod environment;
pub mod error;
pub mod login;
pub mod proof;
pub mod providers;
pub mod state;
pub mod stores;
pub mod token;
pub mod utils;
pub mod verifier;

// Mock implementations for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use accounts::{AccountChanges, AccountService, NewAccount};
pub use authz::Actor;
pub use challenge::ChallengeIssuer;
pub use error::{AuthError, Result};
pub use login::PasswordLogin;
pub use state::{AuthenticatedSession, Principal, PublicUser, Role, UserId};
pub use token::{Claims, TokenService};
pub use verifier::ProofVerifier;
