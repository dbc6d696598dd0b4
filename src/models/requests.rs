//! Request DTOs for the OTP API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for `POST /otp/send`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    /// Phone number in any common formatting of E.164
    pub phone_number: String,
    /// Public key the OTP is bound to
    pub public_key: String,
}

impl SendOtpRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.phone_number.trim().is_empty() {
            return Some("Phone number cannot be empty".to_string());
        }
        if self.public_key.trim().is_empty() {
            return Some("Public key cannot be empty".to_string());
        }
        None
    }
}

/// Request body for `POST /otp/validate`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateOtpRequest {
    pub phone_number: String,
    pub public_key: String,
    /// Code entered by the user
    pub otp_input: String,
    /// Hash returned by `POST /otp/send`
    pub otp_hash: String,
}

impl ValidateOtpRequest {
    pub fn validate(&self) -> Option<String> {
        if self.phone_number.trim().is_empty() {
            return Some("Phone number cannot be empty".to_string());
        }
        if self.otp_input.trim().is_empty() {
            return Some("OTP cannot be empty".to_string());
        }
        if self.otp_hash.trim().is_empty() {
            return Some("OTP hash cannot be empty".to_string());
        }
        None
    }
}
