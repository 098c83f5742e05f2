//! Client-side proof generation.

use crate::error::{ClientError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the login proof for `nonce`.
///
/// `HMAC-SHA256(key = secret, message = nonce)` as 64 lowercase hex digits.
/// The secret itself is never sent.
///
/// # Examples
///
/// ```
/// use sps_client::compute_proof;
///
/// # fn main() -> sps_client::Result<()> {
/// let proof = compute_proof("admin123", "3f2a9c")?;
/// assert_eq!(proof.len(), 64);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`ClientError::Proof`] if the secret cannot key the MAC.
pub fn compute_proof(secret: &str, nonce: &str) -> Result<String> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .map_err(|e| ClientError::Proof(e.to_string()))?;
    mac.update(nonce.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
