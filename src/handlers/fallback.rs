//! Catch-all acknowledgement.

use axum::http::StatusCode;

pub const FALLBACK_BODY: &str = "All Clear Chief.";

/// Any request no other route matched.
pub async fn acknowledge() -> (StatusCode, &'static str) {
    (StatusCode::OK, FALLBACK_BODY)
}
