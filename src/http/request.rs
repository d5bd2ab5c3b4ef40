//! Inbound request context.
//!
//! # Responsibilities
//! - Extract the typed per-request [`SyncContext`] once, before handlers run
//! - Resolve the client IP (first `X-Forwarded-For` hop, else peer address)
//! - Decode the tracking query parameters without validating them
//!
//! # Design Decisions
//! - Extraction never rejects: malformed or missing values become `None`
//! - Repeated query keys keep their first occurrence

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::identity::VisitorIdentity;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

pub const AUDIENCE_TRACKING_ID_PARAM: &str = "audience_tracking_id";
pub const CONTENT_FOCUS_PARAM: &str = "contentFocus";
pub const MAINFRAME_TRACKING_ID_PARAM: &str = "mainframe-tracking-id";

/// Everything the forwarder needs to know about one inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncContext {
    /// Identity attached by the identity middleware.
    pub identity: Option<VisitorIdentity>,
    /// `audience_tracking_id` query parameter.
    pub audience_tracking_id: Option<String>,
    /// `contentFocus` query parameter.
    pub content_focus: Option<String>,
    /// `mainframe-tracking-id` query parameter.
    pub mainframe_tracking_id: Option<String>,
    /// Originating client IP.
    pub client_ip: Option<String>,
}

impl SyncContext {
    /// Build the context from request parts.
    pub fn from_parts(parts: &Parts) -> Self {
        let query = parts.uri.query().unwrap_or_default();
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Self {
            identity: parts.extensions.get::<VisitorIdentity>().cloned(),
            audience_tracking_id: query_param(query, AUDIENCE_TRACKING_ID_PARAM),
            content_focus: query_param(query, CONTENT_FOCUS_PARAM),
            mainframe_tracking_id: query_param(query, MAINFRAME_TRACKING_ID_PARAM),
            client_ip: client_ip(&parts.headers, peer),
        }
    }
}

impl<S> FromRequestParts<S> for SyncContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

/// First occurrence of `name` in a raw query string, percent-decoded.
pub fn query_param(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Leftmost `X-Forwarded-For` entry when present and non-empty, else the
/// socket peer address.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};

    fn parts(uri: &str, forwarded_for: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(xff) = forwarded_for {
            builder = builder.header(X_FORWARDED_FOR, xff);
        }
        let (parts, _) = builder.body(Body::empty()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_query_params_are_decoded_and_unvalidated() {
        let ctx = SyncContext::from_parts(&parts(
            "/track?audience_tracking_id=aud%20one&contentFocus=sports&x=1",
            None,
        ));
        assert_eq!(ctx.audience_tracking_id.as_deref(), Some("aud one"));
        assert_eq!(ctx.content_focus.as_deref(), Some("sports"));
        assert_eq!(ctx.mainframe_tracking_id, None);
    }

    #[test]
    fn test_first_query_occurrence_wins() {
        assert_eq!(
            query_param("mainframe-tracking-id=a&mainframe-tracking-id=b", MAINFRAME_TRACKING_ID_PARAM)
                .as_deref(),
            Some("a")
        );
        assert_eq!(query_param("", MAINFRAME_TRACKING_ID_PARAM), None);
        assert_eq!(query_param("contentFocus=", CONTENT_FOCUS_PARAM).as_deref(), Some(""));
    }

    #[test]
    fn test_client_ip_prefers_first_forwarded_hop() {
        let peer: SocketAddr = "10.0.0.9:5555".parse().unwrap();
        let ctx = parts("/", Some(" 203.0.113.7 , 10.0.0.1"));
        assert_eq!(client_ip(&ctx.headers, Some(peer)).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_client_ip_falls_back_to_peer() {
        let peer: SocketAddr = "10.0.0.9:5555".parse().unwrap();
        assert_eq!(
            client_ip(&parts("/", None).headers, Some(peer)).as_deref(),
            Some("10.0.0.9")
        );
        assert_eq!(
            client_ip(&parts("/", Some("")).headers, Some(peer)).as_deref(),
            Some("10.0.0.9")
        );
        assert_eq!(client_ip(&parts("/", None).headers, None), None);
    }

    #[test]
    fn test_identity_and_peer_come_from_extensions() {
        let mut p = parts("/adwork", None);
        p.extensions.insert(VisitorIdentity::presented("visitor-1"));
        p.extensions
            .insert(ConnectInfo("192.0.2.4:1234".parse::<SocketAddr>().unwrap()));

        let ctx = SyncContext::from_parts(&p);
        assert_eq!(ctx.identity, Some(VisitorIdentity::presented("visitor-1")));
        assert_eq!(ctx.client_ip.as_deref(), Some("192.0.2.4"));
    }
}
