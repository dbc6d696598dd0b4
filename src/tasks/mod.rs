//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Sweep: purges expired pending markers at a configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
