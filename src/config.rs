//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_TTL_SECS;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lifetime of a pending OTP marker in seconds
    pub otp_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds (0 disables the sweep)
    pub sweep_interval: u64,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
    /// Reopen the gate when OTP issuance fails
    pub rollback_on_issue_failure: bool,
    /// Secret mixed into OTP hashes by the development collaborator
    pub otp_secret: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `OTP_TTL` - Pending marker lifetime in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Expired marker sweep frequency in seconds (default: 60)
    /// - `REQUEST_TIMEOUT` - Request timeout in seconds (default: 30)
    /// - `ROLLBACK_ON_ISSUE_FAILURE` - `true`/`false` (default: true)
    /// - `OTP_SECRET` - Hash secret for the development OTP service
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            otp_ttl: env_or("OTP_TTL", defaults.otp_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
            request_timeout: env_or("REQUEST_TIMEOUT", defaults.request_timeout),
            rollback_on_issue_failure: env_or(
                "ROLLBACK_ON_ISSUE_FAILURE",
                defaults.rollback_on_issue_failure,
            ),
            otp_secret: env::var("OTP_SECRET").unwrap_or(defaults.otp_secret),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.otp_ttl)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            otp_ttl: DEFAULT_TTL_SECS,
            server_port: 3000,
            sweep_interval: 60,
            request_timeout: 30,
            rollback_on_issue_failure: true,
            otp_secret: "dev-otp-secret".to_string(),
        }
    }
}
