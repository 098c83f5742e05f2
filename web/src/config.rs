//! Server configuration.
//!
//! Loaded from environment variables, optionally seeded from a `.env` file by
//! the binary. Unset or unparseable values fall back to their defaults.

use sps_auth::config::{AccountPolicy, ChallengeConfig, TokenConfig, parse_duration};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Authentication settings.
    pub auth: AuthConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// JSON user database.
    pub database_path: PathBuf,
    /// Expose Prometheus metrics on `/metrics`.
    pub metrics_enabled: bool,
    /// Take the client address from `X-Forwarded-For` / `X-Real-IP`.
    ///
    /// Only enable behind a reverse proxy that overwrites these headers.
    /// Otherwise clients are identified by their socket address.
    pub trust_proxy: bool,
}

/// Authentication settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session token signing.
    pub token: TokenConfig,
    /// Challenge lifetime.
    pub challenge: ChallengeConfig,
    /// Whether `POST /auth/login` accepts plaintext passwords.
    pub password_login: bool,
    /// Request budget for `/auth` routes.
    pub rate_limit: RateLimitConfig,
    /// Account management rules.
    pub accounts: AccountPolicy,
}

/// Request budget per client address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let duration = |key: &str| lookup(key).and_then(|s| parse_duration(&s));
        let flag = |key: &str, default: bool| lookup(key).and_then(|s| parse_flag(&s)).unwrap_or(default);

        let server = ServerConfig {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed(&lookup, "PORT").unwrap_or(3001),
            database_path: lookup("DATABASE_PATH").map_or_else(|| PathBuf::from("db.json"), PathBuf::from),
            metrics_enabled: flag("METRICS_ENABLED", true),
            trust_proxy: flag("TRUST_PROXY", false),
        };

        let mut token = TokenConfig::new(
            lookup("JWT_SECRET")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| TokenConfig::DEV_SECRET.to_string()),
        );
        if let Some(ttl) = duration("JWT_EXPIRES_IN") {
            token = token.with_ttl(ttl);
        }

        let mut challenge = ChallengeConfig::new();
        if let Some(ttl) = duration("CHALLENGE_TTL") {
            challenge = challenge.with_ttl(ttl);
        }

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            max_requests: parsed(&lookup, "AUTH_RATE_LIMIT_REQUESTS")
                .filter(|&n: &u32| n > 0)
                .unwrap_or(defaults.max_requests),
            window: parsed(&lookup, "AUTH_RATE_LIMIT_WINDOW")
                .filter(|&secs: &u64| secs > 0)
                .map_or(defaults.window, Duration::from_secs),
        };

        let accounts = lookup("PROTECTED_ADMIN_EMAIL")
            .filter(|s| !s.is_empty())
            .map_or_else(AccountPolicy::default, AccountPolicy::new);

        Self {
            server,
            auth: AuthConfig {
                token,
                challenge,
                password_login: flag("AUTH_PASSWORD_LOGIN", true),
                rate_limit,
                accounts,
            },
        }
    }

    /// `host:port` to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);

        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert_eq!(config.server.database_path, PathBuf::from("db.json"));
        assert!(config.server.metrics_enabled);
        assert!(config.auth.token.uses_dev_secret());
        assert_eq!(config.auth.token.ttl, chrono::Duration::hours(2));
        assert_eq!(config.auth.challenge.ttl, chrono::Duration::minutes(5));
        assert!(config.auth.password_login);
        assert_eq!(config.auth.rate_limit, RateLimitConfig::default());
        assert_eq!(config.auth.accounts.protected_email, "admin@sps.com");
        assert!(!config.server.trust_proxy);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_PATH", "/tmp/users.json"),
            ("JWT_SECRET", "s3cr3t"),
            ("JWT_EXPIRES_IN", "30m"),
            ("CHALLENGE_TTL", "90"),
            ("AUTH_PASSWORD_LOGIN", "false"),
            ("AUTH_RATE_LIMIT_REQUESTS", "3"),
            ("AUTH_RATE_LIMIT_WINDOW", "10"),
            ("PROTECTED_ADMIN_EMAIL", "root@sps.com"),
            ("METRICS_ENABLED", "0"),
            ("TRUST_PROXY", "true"),
        ]);

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.server.database_path, PathBuf::from("/tmp/users.json"));
        assert!(!config.server.metrics_enabled);
        assert_eq!(config.auth.token.secret, "s3cr3t");
        assert_eq!(config.auth.token.ttl, chrono::Duration::minutes(30));
        assert_eq!(config.auth.challenge.ttl, chrono::Duration::seconds(90));
        assert!(!config.auth.password_login);
        assert_eq!(config.auth.rate_limit.max_requests, 3);
        assert_eq!(config.auth.rate_limit.window, Duration::from_secs(10));
        assert_eq!(config.auth.accounts.protected_email, "root@sps.com");
        assert!(config.server.trust_proxy);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = config(&[
            ("PORT", "http"),
            ("JWT_EXPIRES_IN", "soon"),
            ("AUTH_PASSWORD_LOGIN", "maybe"),
            ("JWT_SECRET", ""),
            ("AUTH_RATE_LIMIT_REQUESTS", "0"),
            ("AUTH_RATE_LIMIT_WINDOW", "-5"),
            ("CHALLENGE_TTL", "100000000d"),
        ]);

        assert_eq!(config.server.port, 3001);
        assert_eq!(config.auth.token.ttl, chrono::Duration::hours(2));
        assert!(config.auth.password_login);
        assert!(config.auth.token.uses_dev_secret());
        assert_eq!(config.auth.rate_limit, RateLimitConfig::default());
        assert_eq!(config.auth.challenge.ttl, chrono::Duration::minutes(5));
    }
}
