//! API Module
//!
//! HTTP handlers and routing for the OTP gate REST API.
//!
//! # Endpoints
//! - `POST /otp/send` - Issue an OTP for a phone number
//! - `POST /otp/validate` - Validate an OTP
//! - `GET /stats` - Gate statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
