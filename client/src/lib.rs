//! # SPS Client
//!
//! Client side of the SPS challenge-response login.
//!
//! [`compute_proof`] derives the proof from the secret and a server nonce, so
//! the secret stays on the client. [`AuthClient`] drives the HTTP exchange:
//!
//! ```text
//! GET  /auth/challenge?email=...        -> nonce
//! POST /auth/login-challenge {email, proof = HMAC-SHA256(secret, nonce)}
//!                                       -> {token, user}
//! ```
//!
//! Password login is only attempted when [`FallbackPolicy::AllowPasswordLogin`]
//! is set and the server has no challenge endpoint.

pub mod client;
pub mod error;
pub mod proof;

pub use client::{AuthClient, FallbackPolicy, LoginMode, LoginOutcome};
pub use error::{ClientError, Result};
pub use proof::compute_proof;
