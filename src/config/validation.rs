//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check upstream URLs and header names parse
//! - Validate value ranges (timeouts > 0, prefix shape)
//! - Reject wildcard origins while credentials are allowed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::{HeaderName, Method};
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL {value:?}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field}: unsupported URL scheme {scheme:?} (expected http or https)")]
    UnsupportedScheme { field: &'static str, scheme: String },

    #[error("{field}: must start with '/'")]
    RelativePath { field: &'static str },

    #[error("{field}: must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("assets.prefix: must be a non-root path starting with '/'")]
    InvalidAssetPrefix,

    #[error("cors.allowed_origins: wildcard origin is not allowed with credentials")]
    WildcardOrigin,

    #[error("cors.allowed_origins: invalid origin {0:?}")]
    InvalidOrigin(String),

    #[error("cors.allowed_headers: invalid header name {0:?}")]
    InvalidHeader(String),

    #[error("cors.allowed_methods: invalid method {0:?}")]
    InvalidMethod(String),

    #[error("identity.cookie_name: must be a non-empty cookie token")]
    InvalidCookieName,

    #[error("identity.forward_header: invalid header name {0:?}")]
    InvalidForwardHeader(String),

    #[error("timeouts.request_secs: must exceed upstream.response_timeout_ms")]
    RequestTimeoutTooShort,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "upstream.audience_sync_url", &config.upstream.audience_sync_url);
    check_url(&mut errors, "upstream.mainframe_sync_url", &config.upstream.mainframe_sync_url);
    check_path(&mut errors, "upstream.track_path", &config.upstream.track_path);
    check_path(&mut errors, "upstream.adwork_path", &config.upstream.adwork_path);
    check_path(&mut errors, "upstream.mainframe_sync_path", &config.upstream.mainframe_sync_path);

    for (field, value) in [
        ("upstream.connect_timeout_ms", config.upstream.connect_timeout_ms),
        ("upstream.response_timeout_ms", config.upstream.response_timeout_ms),
        ("upstream.idle_timeout_ms", config.upstream.idle_timeout_ms),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }
    if config.timeouts.request_secs.saturating_mul(1000) <= config.upstream.response_timeout_ms
        && config.timeouts.request_secs > 0
    {
        errors.push(ValidationError::RequestTimeoutTooShort);
    }

    let prefix = &config.assets.prefix;
    if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
        errors.push(ValidationError::InvalidAssetPrefix);
    }

    for origin in &config.cors.allowed_origins {
        if origin == "*" {
            if config.cors.allow_credentials {
                errors.push(ValidationError::WildcardOrigin);
            }
        } else if Url::parse(origin).is_err() {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }
    for header in &config.cors.allowed_headers {
        if HeaderName::try_from(header.as_str()).is_err() {
            errors.push(ValidationError::InvalidHeader(header.clone()));
        }
    }
    for method in &config.cors.allowed_methods {
        if Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidMethod(method.clone()));
        }
    }

    let cookie_name = &config.identity.cookie_name;
    if cookie_name.is_empty()
        || !cookie_name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b))
    {
        errors.push(ValidationError::InvalidCookieName);
    }
    if HeaderName::try_from(config.identity.forward_header.as_str()).is_err() {
        errors.push(ValidationError::InvalidForwardHeader(
            config.identity.forward_header.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::UnsupportedScheme {
            field,
            scheme: url.scheme().to_string(),
        }),
        Err(_) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}

fn check_path(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !value.starts_with('/') {
        errors.push(ValidationError::RelativePath { field });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_config(&RelayConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = RelayConfig::default();
        config.upstream.audience_sync_url = "not a url".into();
        config.upstream.mainframe_sync_url = "ftp://example.com".into();
        config.upstream.track_path = "partner-sync".into();
        config.upstream.connect_timeout_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroTimeout {
            field: "upstream.connect_timeout_ms"
        }));
        assert!(errors.contains(&ValidationError::UnsupportedScheme {
            field: "upstream.mainframe_sync_url",
            scheme: "ftp".into(),
        }));
    }

    #[test]
    fn test_wildcard_origin_rejected_with_credentials() {
        let mut config = RelayConfig::default();
        config.cors.allowed_origins = vec!["*".into()];
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::WildcardOrigin])
        );

        config.cors.allow_credentials = false;
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_asset_prefix_shape() {
        for prefix in ["/", "partnerAd", "/partnerAd/"] {
            let mut config = RelayConfig::default();
            config.assets.prefix = prefix.into();
            assert_eq!(
                validate_config(&config),
                Err(vec![ValidationError::InvalidAssetPrefix]),
                "prefix {prefix:?}"
            );
        }
    }

    #[test]
    fn test_cookie_name_must_be_token() {
        let mut config = RelayConfig::default();
        config.identity.cookie_name = "bad name;".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidCookieName])
        );
    }

    #[test]
    fn test_request_timeout_must_cover_upstream_deadline() {
        let mut config = RelayConfig::default();
        config.timeouts.request_secs = 2;
        config.upstream.response_timeout_ms = 2_000;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::RequestTimeoutTooShort])
        );
    }
}
