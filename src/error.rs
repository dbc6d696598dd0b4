//! Error types for the OTP gate
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Collaborator Error Enum ==
/// Errors raised by an [`OtpService`](crate::otp::OtpService) implementation.
///
/// The orchestrator never interprets these; they reach the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The public key supplied by the caller was rejected
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The OTP could not be delivered
    #[error("OTP delivery failed: {0}")]
    Delivery(String),

    /// Any other failure inside the collaborator
    #[error("OTP service error: {0}")]
    Internal(String),
}

// == OTP Error Enum ==
/// Unified error type for the OTP gate.
#[derive(Error, Debug)]
pub enum OtpError {
    /// An OTP request for this phone number is still outstanding
    #[error("OTP already sent recently for phone number {phone}")]
    DuplicateRequest { phone: String, retry_after_secs: u64 },

    /// Phone number could not be normalized to E.164
    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failure surfaced by the OTP collaborator
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

// == IntoResponse Implementation ==
impl IntoResponse for OtpError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let status = match &self {
            OtpError::DuplicateRequest {
                retry_after_secs, ..
            } => {
                let body = Json(json!({
                    "error": message,
                    "retryAfterSecs": retry_after_secs,
                }));
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, retry_after_secs.to_string())],
                    body,
                )
                    .into_response();
            }
            OtpError::InvalidPhoneNumber(_) | OtpError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            OtpError::Collaborator(CollaboratorError::InvalidPublicKey(_)) => {
                StatusCode::BAD_REQUEST
            }
            OtpError::Collaborator(CollaboratorError::Delivery(_)) => StatusCode::BAD_GATEWAY,
            OtpError::Collaborator(CollaboratorError::Internal(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the OTP gate.
pub type Result<T> = std::result::Result<T, OtpError>;
