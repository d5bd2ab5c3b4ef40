//! Cookie header parsing and `Set-Cookie` construction.
//!
//! Only what the identity cookie needs: look a single name up across all
//! `Cookie` headers and render one `Set-Cookie` directive. Values are opaque;
//! nothing beyond surrounding double quotes is stripped.

use axum::http::header::{InvalidHeaderValue, COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use crate::config::IdentityConfig;

/// Find the value of cookie `name` in the request headers.
///
/// Every `Cookie` header is scanned (HTTP/2 clients may split them) and the
/// first matching pair wins. Pairs that are not valid UTF-8 or lack `=` are
/// skipped.
pub fn find(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| unquote(value.trim()).to_string())
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Render a session `Set-Cookie` directive (no `Expires`/`Max-Age`).
pub fn set_cookie(
    config: &IdentityConfig,
    value: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut directive = format!("{}={}; Path={}", config.cookie_name, value, config.path);
    if let Some(domain) = &config.domain {
        directive.push_str("; Domain=");
        directive.push_str(domain);
    }
    if config.secure {
        directive.push_str("; Secure; SameSite=None");
    }
    HeaderValue::from_str(&directive)
}
