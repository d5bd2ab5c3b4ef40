//! Identity assignment middleware.
//!
//! Runs on every request after the origin policy. Reads the identity cookie,
//! mints a fresh token when it is absent, exposes the result to handlers as a
//! [`VisitorIdentity`] request extension, and sets the cookie on the way out
//! for freshly minted identities only.

use axum::{
    extract::{Request, State},
    http::header::{ORIGIN, SET_COOKIE},
    middleware::Next,
    response::Response,
};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::IdentityConfig;
use crate::identity::cookie;
use crate::observability::metrics;

/// Opaque per-visitor token carried by the identity cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorIdentity {
    value: String,
    minted: bool,
}

impl VisitorIdentity {
    /// Mint a new identity from a v4 UUID (122 random bits from the OS CSPRNG).
    ///
    /// Collisions are not detected.
    pub fn mint() -> Self {
        Self {
            value: Uuid::new_v4().to_string(),
            minted: true,
        }
    }

    /// Wrap an identity the client presented. Never validated.
    pub fn presented(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            minted: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// True when this request minted the identity.
    pub fn is_minted(&self) -> bool {
        self.minted
    }
}

impl fmt::Display for VisitorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Immutable identity settings shared by the middleware.
#[derive(Debug, Clone)]
pub struct IdentityPolicy {
    config: IdentityConfig,
}

impl IdentityPolicy {
    pub fn new(config: IdentityConfig) -> Self {
        Self { config }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// Resolve the identity for a request's headers. An empty cookie value
    /// counts as absent.
    pub fn resolve(&self, headers: &axum::http::HeaderMap) -> VisitorIdentity {
        match cookie::find(headers, &self.config.cookie_name) {
            Some(value) if !value.is_empty() => VisitorIdentity::presented(value),
            _ => VisitorIdentity::mint(),
        }
    }
}

/// Middleware attaching a [`VisitorIdentity`] to every request.
pub async fn assign_identity(
    State(policy): State<Arc<IdentityPolicy>>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = policy.resolve(request.headers());

    tracing::debug!(
        origin = ?request.headers().get(ORIGIN),
        identity = %identity,
        minted = identity.is_minted(),
        "Visitor identity resolved"
    );

    request.extensions_mut().insert(identity.clone());
    let mut response = next.run(request).await;

    if identity.is_minted() {
        match cookie::set_cookie(&policy.config, identity.as_str()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
                metrics::record_identity_minted();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode identity cookie");
            }
        }
    }

    response
}
