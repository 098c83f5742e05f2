//! Nonce generation and proof-of-knowledge checks.
//!
//! A proof is `HMAC-SHA256(key = secret, message = nonce)`, hex-encoded.
//! The client computes it locally so the secret never crosses the wire.

use crate::error::{AuthError, Result};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Nonce size in bytes (128 bits of entropy).
pub const NONCE_BYTES: usize = 16;

/// Length of a hex-encoded proof (256-bit digest).
pub const PROOF_HEX_LEN: usize = 64;

/// Generate a fresh nonce from the OS CSPRNG, lowercase hex.
#[must_use]
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Returns `true` if `proof` is exactly [`PROOF_HEX_LEN`] hex digits.
///
/// Either case is accepted.
///
/// # Examples
///
/// ```
/// use sps_auth::proof::is_well_formed_proof;
///
/// assert!(is_well_formed_proof(&"aB".repeat(32)));
/// assert!(!is_well_formed_proof("abc"));
/// assert!(!is_well_formed_proof(&"zz".repeat(32)));
/// ```
#[must_use]
pub fn is_well_formed_proof(proof: &str) -> bool {
    proof.len() == PROOF_HEX_LEN && proof.bytes().all(|b| b.is_ascii_hexdigit())
}

fn keyed(secret: &str) -> Result<HmacSha256> {
    <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .map_err(|e| AuthError::Internal(format!("Invalid proof key: {e}")))
}

/// Compute the proof the server expects for `secret` and `nonce`.
///
/// # Errors
///
/// Returns `AuthError::Internal` if the secret cannot key the MAC.
pub fn expected_proof(secret: &str, nonce: &str) -> Result<String> {
    let mut mac = keyed(secret)?;
    mac.update(nonce.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a submitted proof against `secret` and `nonce` in constant time.
///
/// Malformed hex or a digest of the wrong length is a mismatch.
#[must_use]
pub fn verify_proof(secret: &str, nonce: &str, proof_hex: &str) -> bool {
    let Ok(submitted) = hex::decode(proof_hex) else {
        return false;
    };

    let Ok(mut mac) = keyed(secret) else {
        return false;
    };
    mac.update(nonce.as_bytes());
    mac.verify_slice(&submitted).is_ok()
}
