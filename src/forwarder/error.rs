//! Forwarder errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::time::Duration;
use thiserror::Error;

/// Failure to build the forwarder at startup.
#[derive(Debug, Error)]
pub enum ForwarderError {
    #[error("invalid upstream URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid identity header name {0:?}")]
    InvalidHeaderName(String),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Failure of a single relay. Converted to a gateway-class response.
///
/// Upstream error *statuses* are not errors: they are relayed unchanged.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("upstream for {route} unreachable: {source}")]
    Unreachable {
        route: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream for {route} sent no response within {after:?}")]
    Timeout { route: &'static str, after: Duration },
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unreachable { .. } => StatusCode::BAD_GATEWAY,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Classify a client error from `send()`.
    pub(crate) fn from_send(route: &'static str, error: reqwest::Error, deadline: Duration) -> Self {
        if error.is_timeout() && !error.is_connect() {
            Self::Timeout {
                route,
                after: deadline,
            }
        } else {
            Self::Unreachable {
                route,
                source: error,
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Relay failed");
        let body = match &self {
            Self::Unreachable { .. } => "Upstream request failed",
            Self::Timeout { .. } => "Upstream request timed out",
        };
        (self.status(), body).into_response()
    }
}
