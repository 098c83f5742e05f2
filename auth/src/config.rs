//! Authentication configuration.
//!
//! Configuration values should be provided by the application, not hardcoded.
//! Defaults match the behavior the service has always shipped with.

use chrono::Duration;

/// Challenge-response configuration.
#[derive(Debug, Clone)]
pub struct ChallengeConfig {
    /// How long an issued nonce stays redeemable.
    ///
    /// Default: 5 minutes
    pub ttl: Duration,
}

impl ChallengeConfig {
    /// Create challenge configuration with the default TTL.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ttl: Duration::minutes(5),
        }
    }

    /// Set challenge time-to-live.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Session token configuration.
#[derive(Clone)]
pub struct TokenConfig {
    /// Symmetric signing key. Sole trust root for session integrity.
    pub secret: String,

    /// Token validity window.
    ///
    /// Default: 2 hours
    pub ttl: Duration,
}

impl TokenConfig {
    /// Signing secret used when none is configured.
    pub const DEV_SECRET: &'static str = "dev-secret";

    /// Create token configuration.
    ///
    /// # Arguments
    ///
    /// * `secret` - HMAC signing key
    #[must_use]
    pub const fn new(secret: String) -> Self {
        Self {
            secret,
            ttl: Duration::hours(2),
        }
    }

    /// Set token validity window.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns `true` when running on the built-in development secret.
    #[must_use]
    pub fn uses_dev_secret(&self) -> bool {
        self.secret == Self::DEV_SECRET
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::new(Self::DEV_SECRET.to_string())
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Account management policy.
#[derive(Debug, Clone)]
pub struct AccountPolicy {
    /// Email of the account that can never be deleted.
    ///
    /// Default: `admin@sps.com`
    pub protected_email: String,
}

impl AccountPolicy {
    /// Create policy protecting the given account.
    #[must_use]
    pub const fn new(protected_email: String) -> Self {
        Self { protected_email }
    }
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self::new("admin@sps.com".to_string())
    }
}

/// Longest duration [`parse_duration`] accepts.
pub const MAX_DURATION: Duration = Duration::days(365);

/// Parse a human duration such as `90`, `45s`, `30m`, `2h` or `1d`.
///
/// Bare numbers are seconds. Returns `None` for anything else, including
/// zero, negative values and anything longer than [`MAX_DURATION`].
///
/// # Examples
///
/// ```
/// use sps_auth::config::parse_duration;
/// use chrono::Duration;
///
/// assert_eq!(parse_duration("2h"), Some(Duration::hours(2)));
/// assert_eq!(parse_duration("300"), Some(Duration::seconds(300)));
/// assert_eq!(parse_duration("soon"), None);
/// ```
#[must_use]
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let value: i64 = digits.parse().ok()?;
    if value <= 0 {
        return None;
    }

    let duration = match unit {
        "" | "s" => Duration::try_seconds(value),
        "m" => Duration::try_minutes(value),
        "h" => Duration::try_hours(value),
        "d" => Duration::try_days(value),
        _ => None,
    }?;

    (duration <= MAX_DURATION).then_some(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_config_builder() {
        let config = ChallengeConfig::new().with_ttl(Duration::seconds(30));
        assert_eq!(config.ttl, Duration::seconds(30));
    }

    #[test]
    fn test_token_config_builder() {
        let config = TokenConfig::new("s3cret".to_string()).with_ttl(Duration::minutes(15));

        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.ttl, Duration::minutes(15));
        assert!(!config.uses_dev_secret());
    }

    #[test]
    fn test_default_configs() {
        assert_eq!(ChallengeConfig::default().ttl, Duration::minutes(5));

        let token = TokenConfig::default();
        assert_eq!(token.ttl, Duration::hours(2));
        assert!(token.uses_dev_secret());

        assert_eq!(AccountPolicy::default().protected_email, "admin@sps.com");
    }

    #[test]
    fn test_token_config_debug_redacts_secret() {
        let rendered = format!("{:?}", TokenConfig::new("hunter2".to_string()));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("45s"), Some(Duration::seconds(45)));
        assert_eq!(parse_duration("30m"), Some(Duration::minutes(30)));
        assert_eq!(parse_duration(" 2h "), Some(Duration::hours(2)));
        assert_eq!(parse_duration("1d"), Some(Duration::days(1)));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("0"), None);
        assert_eq!(parse_duration("h"), None);
        assert_eq!(parse_duration("5w"), None);
        assert_eq!(parse_duration("-5m"), None);
    }

    #[test]
    fn test_parse_duration_caps_length() {
        assert_eq!(parse_duration("365d"), Some(MAX_DURATION));
        assert_eq!(parse_duration("366d"), None);
        assert_eq!(parse_duration("100000000d"), None);
        assert_eq!(parse_duration("99999999999999999999"), None);
    }
}
