//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → timeouts.rs (enforce the backend deadline)
//!     → on timeout: 504, no retry
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every backend call has a deadline
//! - Retries, if any, belong to the backend's own policy

pub mod timeouts;

pub use timeouts::invoke_with_timeout;
