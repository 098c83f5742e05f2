//! Rate limiter trait for authentication attempts.

use crate::error::Result;
use std::future::Future;
use std::net::IpAddr;

/// Per-client request budget.
///
/// The quota is fixed when the limiter is built; callers only say who is
/// asking.
///
/// # Example
///
/// ```no_run
/// use sps_auth::providers::RateLimiter;
/// use std::net::{IpAddr, Ipv4Addr};
///
/// # async fn example(limiter: impl RateLimiter) -> Result<(), Box<dyn std::error::Error>> {
/// limiter
///     .check_and_record(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub trait RateLimiter: Send + Sync {
    /// Check the budget for `client` and spend one request from it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TooManyAttempts` with the time until the next
    /// request would be allowed.
    fn check_and_record(&self, client: IpAddr) -> impl Future<Output = Result<()>> + Send;
}
