//! Origin policy.
//!
//! Declares which origins may read responses, which request headers and
//! methods they may use, and that credentialed (cookie-bearing) calls are
//! allowed. Applied to every request ahead of identity assignment; preflight
//! `OPTIONS` requests are answered here.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Build the CORS layer from configuration.
///
/// Entries that fail to parse are dropped with a warning; validation rejects
/// them before this point in normal startup.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| parse_or_warn(o, "origin", |s| s.parse::<HeaderValue>().ok()))
        .collect();

    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| parse_or_warn(h, "header", |s| HeaderName::try_from(s).ok()))
        .collect();

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| parse_or_warn(m, "method", |s| Method::from_bytes(s.as_bytes()).ok()))
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_headers(headers)
        .allow_methods(methods)
        .allow_credentials(config.allow_credentials)
}

fn parse_or_warn<T>(raw: &str, kind: &'static str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let parsed = parse(raw);
    if parsed.is_none() {
        tracing::warn!(kind, value = %raw, "Ignoring unparseable CORS entry");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(build_cors_layer(&CorsConfig::default()))
    }

    #[tokio::test]
    async fn test_allowed_origin_is_echoed_with_credentials() {
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "https://cookie-sync-publisher.herokuapp.com")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://cookie-sync-publisher.herokuapp.com"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }

    #[tokio::test]
    async fn test_unknown_origin_gets_no_allow_origin() {
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "https://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_preflight_lists_headers_and_methods() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/")
            .header(header::ORIGIN, "https://cookie-sync-audience-service.herokuapp.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-audience-tracking-id")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let allow_headers = response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_string();
        assert!(allow_headers.contains("x-audience-tracking-id"));
        assert!(allow_headers.contains("x-contentfocus"));

        let allow_methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
            assert!(allow_methods.contains(method), "missing {method}");
        }
    }
}
