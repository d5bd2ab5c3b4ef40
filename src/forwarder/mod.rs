//! Upstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! GET /track                          GET /adwork
//!     │                                   │
//!     │                                   ├─▶ sync.rs: mainframe side-call
//!     │                                   │   (awaited, outcome discarded)
//!     ▼                                   ▼
//! client.rs: attach identity headers, strip hop-by-hop, stream body up
//!     → upstream (deadline for response headers)
//!     → http/response.rs: copy status + headers, stream body back
//! ```
//!
//! # Design Decisions
//! - Transparent: upstream error statuses are relayed, not translated
//! - Unreachable upstream → 502, no headers before deadline → 504
//! - Identifiers are forwarded unvalidated
//! - No retries

pub mod client;
pub mod error;
pub mod sync;

pub use client::Forwarder;
pub use error::{ForwarderError, RelayError};
pub use sync::SideCallOutcome;
