//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream calls with a deadline for response headers
//! - Cancel the in-flight call cleanly on expiry (the future is dropped)
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out relays return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

/// The deadline passed before the wrapped future completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("deadline of {0:?} elapsed")]
pub struct Elapsed(pub Duration);

/// Run `future` to completion or fail once `deadline` passes.
pub async fn with_deadline<F, T>(deadline: Duration, future: F) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(deadline, future)
        .await
        .map_err(|_| Elapsed(deadline))
}
