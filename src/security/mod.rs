//! Security subsystem.
//!
//! # Components
//! - cors.rs: origin policy (explicit allow-lists, credentialed calls)
//! - headers.rs: hop-by-hop stripping for relayed messages
//!
//! # Design Decisions
//! - No wildcard origins: credentials are allowed
//! - Relayed identifiers are forwarded unvalidated; upstreams must not
//!   treat them as sanitized

pub mod cors;
pub mod headers;

pub use cors::build_cors_layer;
pub use headers::{strip_hop_by_hop, upstream_request_headers};
