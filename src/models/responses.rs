//! Response DTOs for the OTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for `POST /otp/send`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    /// Normalized phone number the OTP was issued for
    pub phone_number: String,
    /// Payload returned by the OTP service (the OTP hash)
    pub otp_hash: String,
}

impl SendOtpResponse {
    pub fn new(phone_number: impl Into<String>, otp_hash: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            otp_hash: otp_hash.into(),
        }
    }
}

/// Response body for `POST /otp/validate`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateOtpResponse {
    pub phone_number: String,
    /// Whether the OTP matched
    pub valid: bool,
}

impl ValidateOtpResponse {
    pub fn new(phone_number: impl Into<String>, valid: bool) -> Self {
        Self {
            phone_number: phone_number.into(),
            valid,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Requests admitted through the gate
    pub admitted: u64,
    /// Requests rejected as duplicates
    pub rejected: u64,
    /// Markers cleared by successful validation
    pub released: u64,
    /// Markers evicted after their TTL
    pub expired: u64,
    /// Admissions undone after failed issuance
    pub rolled_back: u64,
    /// Markers currently stored
    pub pending: usize,
    /// rejected / (admitted + rejected)
    pub rejection_rate: f64,
    /// Marker lifetime in seconds
    pub ttl_secs: u64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, ttl_secs: u64) -> Self {
        Self {
            admitted: stats.admitted,
            rejected: stats.rejected,
            released: stats.released,
            expired: stats.expired,
            rolled_back: stats.rolled_back,
            pending: stats.pending,
            rejection_rate: stats.rejection_rate(),
            ttl_secs,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
