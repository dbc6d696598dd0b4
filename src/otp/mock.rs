//! Mock OTP Service
//!
//! Development collaborator that logs codes instead of delivering them.
//! The OTP hash binds the code to the phone number, the public key and a
//! server secret, so `verify` needs no storage.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use constant_time_eq::constant_time_eq;
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::error::CollaboratorError;
use crate::otp::OtpService;
use crate::phone::mask_phone_number;

/// Number of digits in a generated code
const OTP_DIGITS: u32 = 6;

/// Development OTP collaborator.
#[derive(Debug)]
pub struct MockOtpService {
    /// Secret mixed into every hash
    secret: String,
    /// Number of successful `issue` calls
    issued: AtomicU64,
    /// Whether `issue` should fail with a delivery error
    simulate_failure: AtomicBool,
}

impl MockOtpService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issued: AtomicU64::new(0),
            simulate_failure: AtomicBool::new(false),
        }
    }

    /// Makes subsequent `issue` calls fail (or succeed again).
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    pub fn issued_count(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Hex SHA-256 of the code bound to phone number, public key and secret.
    pub fn compute_hash(&self, otp: &str, phone_number: &str, public_key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(otp.as_bytes());
        hasher.update(b":");
        hasher.update(phone_number.as_bytes());
        hasher.update(b":");
        hasher.update(public_key.as_bytes());
        hasher.update(b":");
        hasher.update(self.secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn generate_code() -> String {
        let upper = 10u32.pow(OTP_DIGITS);
        let code = rand::thread_rng().gen_range(0..upper);
        format!("{:0width$}", code, width = OTP_DIGITS as usize)
    }
}

#[async_trait]
impl OtpService for MockOtpService {
    async fn issue(
        &self,
        phone_number: &str,
        public_key: &str,
    ) -> Result<String, CollaboratorError> {
        if public_key.trim().is_empty() {
            return Err(CollaboratorError::InvalidPublicKey(
                "public key must not be empty".to_string(),
            ));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                "Simulated OTP delivery failure for {}",
                mask_phone_number(phone_number)
            );
            return Err(CollaboratorError::Delivery(
                "simulated delivery failure".to_string(),
            ));
        }

        let code = Self::generate_code();
        let hash = self.compute_hash(&code, phone_number, public_key);
        self.issued.fetch_add(1, Ordering::SeqCst);

        info!(
            "[MOCK OTP] To: {} | Code: {}",
            mask_phone_number(phone_number),
            code
        );

        Ok(hash)
    }

    async fn verify(
        &self,
        phone_number: &str,
        public_key: &str,
        candidate_otp: &str,
        stored_hash: &str,
    ) -> Result<bool, CollaboratorError> {
        let expected = self.compute_hash(candidate_otp.trim(), phone_number, public_key);
        let stored = stored_hash.trim().to_ascii_lowercase();

        Ok(constant_time_eq(expected.as_bytes(), stored.as_bytes()))
    }
}
