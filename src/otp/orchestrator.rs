//! OTP Orchestrator
//!
//! Gates OTP issuance so that each phone number has at most one outstanding
//! request, and reopens the gate once an OTP is validated.
//!
//! Per phone number: `IDLE` (no marker) -> `PENDING` (OTP issued, awaiting
//! validation) -> `IDLE` (validated, expired, or issuance rolled back).

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{Admission, PhoneNumberCache};
use crate::error::{OtpError, Result};
use crate::otp::OtpService;
use crate::phone::{mask_phone_number, normalize_phone_number};

/// Coordinates the deduplication gate and the OTP collaborator.
///
/// Holds no per-request state of its own; cheap to share behind an `Arc`.
#[derive(Clone)]
pub struct OtpOrchestrator {
    cache: Arc<PhoneNumberCache>,
    service: Arc<dyn OtpService>,
    /// Undo the admission when issuance fails
    rollback_on_failure: bool,
}

impl OtpOrchestrator {
    /// Creates an orchestrator that rolls back admissions on failed issuance.
    pub fn new(cache: Arc<PhoneNumberCache>, service: Arc<dyn OtpService>) -> Self {
        Self {
            cache,
            service,
            rollback_on_failure: true,
        }
    }

    /// When `false`, a failed or cancelled issuance leaves the number
    /// `PENDING` until the TTL elapses.
    pub fn with_rollback_on_failure(mut self, rollback: bool) -> Self {
        self.rollback_on_failure = rollback;
        self
    }

    pub fn cache(&self) -> &Arc<PhoneNumberCache> {
        &self.cache
    }

    // == Send OTP ==
    /// Issues an OTP for `phone_number` unless one is already outstanding.
    ///
    /// Returns the collaborator's payload unchanged. Fails with
    /// [`OtpError::DuplicateRequest`] without calling the collaborator when
    /// the number is `PENDING`. Collaborator errors propagate as-is. If the
    /// returned future is dropped before the collaborator answers, the
    /// admission is rolled back like a failure.
    pub async fn send_otp(&self, phone_number: &str, public_key: &str) -> Result<String> {
        let phone = normalize_phone_number(phone_number)?;
        self.send_normalized(&phone, public_key).await
    }

    /// [`send_otp`](Self::send_otp) for a number already in E.164 form.
    pub(crate) async fn send_normalized(&self, phone: &str, public_key: &str) -> Result<String> {
        let masked = mask_phone_number(phone);

        let ticket = match self.cache.try_admit(phone) {
            Admission::Admitted { ticket } => ticket,
            Admission::Pending { retry_after } => {
                warn!(
                    "Phone number {} is already in cache. Rejecting request.",
                    masked
                );
                return Err(OtpError::DuplicateRequest {
                    phone: masked,
                    retry_after_secs: retry_after.as_secs_f64().ceil() as u64,
                });
            }
        };

        // Rolls the admission back on error or if this future is dropped mid-issue
        let mut guard = AdmissionGuard {
            cache: &self.cache,
            phone,
            ticket,
            armed: self.rollback_on_failure,
        };

        match self.service.issue(phone, public_key).await {
            Ok(response) => {
                guard.disarm();
                info!("OTP issued for phone number {}", masked);
                Ok(response)
            }
            Err(err) => {
                warn!("OTP issuance failed for phone number {}: {}", masked, err);
                Err(err.into())
            }
        }
    }

    // == Validate OTP ==
    /// Verifies `candidate_otp` through the collaborator.
    ///
    /// On success the phone number's marker is removed so a new OTP may be
    /// requested immediately. On mismatch the marker and its TTL are left
    /// untouched. A number with no outstanding request may still be validated.
    pub async fn validate_otp(
        &self,
        phone_number: &str,
        public_key: &str,
        candidate_otp: &str,
        stored_hash: &str,
    ) -> Result<bool> {
        let phone = normalize_phone_number(phone_number)?;
        self.validate_normalized(&phone, public_key, candidate_otp, stored_hash)
            .await
    }

    /// [`validate_otp`](Self::validate_otp) for a number already in E.164 form.
    pub(crate) async fn validate_normalized(
        &self,
        phone: &str,
        public_key: &str,
        candidate_otp: &str,
        stored_hash: &str,
    ) -> Result<bool> {
        let masked = mask_phone_number(phone);

        let valid = self
            .service
            .verify(phone, public_key, candidate_otp, stored_hash)
            .await?;

        if valid {
            info!(
                "OTP validation successful for phone number: {}. Clearing from cache.",
                masked
            );
            self.cache.remove_from_cache(phone);
        } else {
            warn!("OTP validation failed for phone number: {}.", masked);
        }

        Ok(valid)
    }
}

/// Undoes an admission when dropped while still armed.
struct AdmissionGuard<'a> {
    cache: &'a PhoneNumberCache,
    phone: &'a str,
    ticket: u64,
    armed: bool,
}

impl AdmissionGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for AdmissionGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.cache.rollback(self.phone, self.ticket) {
            warn!(
                "OTP issuance did not complete for phone number {}, gate reopened",
                mask_phone_number(self.phone)
            );
        }
    }
}
