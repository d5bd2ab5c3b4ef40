//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → security/cors (origin policy)
//!     → identity (cookie → VisitorIdentity)
//!     → request.rs (SyncContext: identity, query ids, client IP)
//!     → handlers (relay, bid, assets, fallback)
//!     → response.rs (stream upstream response back)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::SyncContext;
pub use server::{AppState, HttpServer, ServerError};
