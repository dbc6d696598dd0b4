//! OTP Gate - One-time-password issuance with per-phone-number deduplication
//!
//! Allows at most one outstanding OTP request per phone number within a TTL
//! window, and reopens the gate once the OTP is validated.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod otp;
pub mod phone;
pub mod tasks;

pub use api::AppState;
pub use cache::PhoneNumberCache;
pub use config::Config;
pub use error::{CollaboratorError, OtpError};
pub use otp::{MockOtpService, OtpOrchestrator, OtpService};
pub use tasks::spawn_cleanup_task;
