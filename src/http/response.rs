//! Upstream response relaying.
//!
//! # Responsibilities
//! - Copy upstream status and end-to-end headers to the client
//! - Stream the upstream body chunk by chunk
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Hop-by-hop headers stripped automatically
//! - Upstream error statuses pass through untranslated

use axum::{body::Body, response::Response};
use futures_util::TryStreamExt;

use crate::security::strip_hop_by_hop;

/// Turn an upstream response into a client response without buffering.
pub fn relay_response(upstream: reqwest::Response, route: &'static str) -> Response {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);

    let body = upstream.bytes_stream().inspect_err(move |e| {
        tracing::warn!(route, error = %e, "Upstream body stream failed");
    });

    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
