//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → reqwest client (connect timeout, per-read idle timeout)
//!     → timeouts.rs (deadline for response headers)
//!     → On failure: 502 (unreachable) or 504 (deadline)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - No retries: callers retry at the application layer

pub mod timeouts;

pub use timeouts::{with_deadline, Elapsed};
