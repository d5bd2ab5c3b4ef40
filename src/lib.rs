//! Cookie-sync partner relay.
//!
//! Assigns visitors a tracking identity cookie, relays tracking calls to the
//! mainframe sync service, serves a mock bid and static ad files.

pub mod config;
pub mod forwarder;
pub mod handlers;
pub mod http;
pub mod identity;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
