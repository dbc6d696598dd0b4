//! API Handlers
//!
//! HTTP request handlers for each OTP gate endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::cache::PhoneNumberCache;
use crate::config::Config;
use crate::error::{OtpError, Result};
use crate::models::{
    HealthResponse, SendOtpRequest, SendOtpResponse, StatsResponse, ValidateOtpRequest,
    ValidateOtpResponse,
};
use crate::otp::{MockOtpService, OtpOrchestrator, OtpService};
use crate::phone::normalize_phone_number;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Gate plus OTP collaborator
    pub orchestrator: OtpOrchestrator,
}

impl AppState {
    /// Creates a new AppState around an orchestrator.
    pub fn new(orchestrator: OtpOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Creates a new AppState from configuration with the given collaborator.
    pub fn with_service(config: &Config, service: Arc<dyn OtpService>) -> Self {
        let cache = Arc::new(PhoneNumberCache::new(config.ttl()));
        let orchestrator = OtpOrchestrator::new(cache, service)
            .with_rollback_on_failure(config.rollback_on_issue_failure);
        Self::new(orchestrator)
    }

    /// Creates a new AppState from configuration, backed by the development
    /// OTP service.
    pub fn from_config(config: &Config) -> Self {
        let service = Arc::new(MockOtpService::new(config.otp_secret.clone()));
        Self::with_service(config, service)
    }

    pub fn cache(&self) -> &Arc<PhoneNumberCache> {
        self.orchestrator.cache()
    }
}

/// Handler for POST /otp/send
///
/// Issues an OTP unless one is already outstanding for the phone number.
pub async fn send_otp_handler(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(OtpError::InvalidRequest(error_msg));
    }

    let phone = normalize_phone_number(&req.phone_number)?;
    let otp_hash = state
        .orchestrator
        .send_normalized(&phone, &req.public_key)
        .await?;

    Ok(Json(SendOtpResponse::new(phone, otp_hash)))
}

/// Handler for POST /otp/validate
///
/// A wrong OTP is reported as `valid: false` with status 200.
pub async fn validate_otp_handler(
    State(state): State<AppState>,
    Json(req): Json<ValidateOtpRequest>,
) -> Result<Json<ValidateOtpResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(OtpError::InvalidRequest(error_msg));
    }

    let phone = normalize_phone_number(&req.phone_number)?;
    let valid = state
        .orchestrator
        .validate_normalized(&phone, &req.public_key, &req.otp_input, &req.otp_hash)
        .await?;

    Ok(Json(ValidateOtpResponse::new(phone, valid)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache();
    Json(StatsResponse::new(&cache.stats(), cache.ttl().as_secs()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
