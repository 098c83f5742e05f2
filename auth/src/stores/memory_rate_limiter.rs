//! In-memory rate limiter keyed by client address.

use crate::error::{AuthError, Result};
use crate::providers::RateLimiter;
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::Quota;
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type KeyedLimiter = governor::RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Number of tracked clients at which idle entries are purged.
pub const DEFAULT_RETAIN_THRESHOLD: usize = 10_000;

/// GCRA limiter allowing `max_attempts` per `window` for each client.
///
/// A client may burst up to `max_attempts` requests, after which one request
/// is refilled every `window / max_attempts`. Clients whose budget has fully
/// refilled are dropped once the table reaches the retain threshold, so the
/// table stays bounded by the number of recently active clients.
#[derive(Clone)]
pub struct InMemoryRateLimiter {
    limiter: Arc<KeyedLimiter>,
    clock: DefaultClock,
    max_attempts: NonZeroU32,
    window: Duration,
    retain_threshold: usize,
}

impl InMemoryRateLimiter {
    /// Create a limiter allowing `max_attempts` per `window`.
    ///
    /// A zero `max_attempts` is treated as one.
    #[must_use]
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        let max_attempts = NonZeroU32::new(max_attempts).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(window / max_attempts.get())
            .unwrap_or_else(|| Quota::per_second(max_attempts))
            .allow_burst(max_attempts);

        Self {
            limiter: Arc::new(governor::RateLimiter::keyed(quota)),
            clock: DefaultClock::default(),
            max_attempts,
            window,
            retain_threshold: DEFAULT_RETAIN_THRESHOLD,
        }
    }

    /// Purge idle clients once this many are tracked.
    ///
    /// Default: [`DEFAULT_RETAIN_THRESHOLD`]
    #[must_use]
    pub const fn with_retain_threshold(mut self, threshold: usize) -> Self {
        self.retain_threshold = threshold;
        self
    }

    /// Number of clients currently tracked.
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

impl std::fmt::Debug for InMemoryRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRateLimiter")
            .field("max_attempts", &self.max_attempts)
            .field("window", &self.window)
            .field("tracked_clients", &self.tracked_clients())
            .finish_non_exhaustive()
    }
}

impl RateLimiter for InMemoryRateLimiter {
    async fn check_and_record(&self, client: IpAddr) -> Result<()> {
        let outcome = self.limiter.check_key(&client);

        if self.limiter.len() >= self.retain_threshold {
            self.limiter.retain_recent();
            tracing::debug!(
                tracked_clients = self.limiter.len(),
                "Purged idle rate limit entries"
            );
        }

        match outcome {
            Ok(()) => Ok(()),
            Err(not_until) => {
                let retry_after = not_until.wait_time_from(self.clock.now());

                tracing::warn!(
                    rate_limit_exceeded = true,
                    client = %client,
                    max_attempts = self.max_attempts.get(),
                    window_secs = self.window.as_secs(),
                    "Rate limit exceeded"
                );
                metrics::counter!("auth_rate_limited_total").increment(1);

                Err(AuthError::TooManyAttempts { retry_after })
            }
        }
    }
}
