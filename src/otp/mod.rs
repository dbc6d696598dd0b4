//! OTP Module
//!
//! The collaborator contract for generating and verifying OTPs, the
//! orchestrator that gates issuance per phone number, and a development
//! collaborator.

mod mock;
mod orchestrator;

use async_trait::async_trait;

use crate::error::CollaboratorError;

pub use mock::MockOtpService;
pub use orchestrator::OtpOrchestrator;

/// Generates, delivers and verifies OTPs.
///
/// Implementations own hash storage and the comparison algorithm. Phone
/// numbers passed in are already normalized to E.164.
#[async_trait]
pub trait OtpService: Send + Sync {
    /// Issues an OTP bound to `public_key` and returns an opaque payload
    /// (typically the OTP hash the caller presents again at validation).
    async fn issue(&self, phone_number: &str, public_key: &str)
        -> Result<String, CollaboratorError>;

    /// Checks `candidate_otp` against `stored_hash`.
    ///
    /// A mismatch is `Ok(false)`, not an error.
    async fn verify(
        &self,
        phone_number: &str,
        public_key: &str,
        candidate_otp: &str,
        stored_hash: &str,
    ) -> Result<bool, CollaboratorError>;
}
