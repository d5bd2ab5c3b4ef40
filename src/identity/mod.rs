//! Visitor identity subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → cookie.rs (find identity cookie)
//!     → assigner.rs (pass through, or mint UUID v4)
//!     → VisitorIdentity in request extensions
//!     → handlers / forwarder read it
//!     → Set-Cookie appended for minted identities
//! ```
//!
//! # Design Decisions
//! - Server is stateless: the cookie is the only store
//! - Presented values are opaque and never validated or re-minted

pub mod assigner;
pub mod cookie;

pub use assigner::{assign_identity, IdentityPolicy, VisitorIdentity};
