//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Upstream sync service endpoints and deadlines.
    pub upstream: UpstreamConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Visitor identity cookie settings.
    pub identity: IdentityConfig,

    /// Mock bid settings.
    pub bidding: BiddingConfig,

    /// Static asset settings.
    pub assets: AssetsConfig,

    /// Server-side timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. Overridden by `--port` / `PORT`.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7000,
        }
    }
}

/// Upstream ("mainframe") endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the audience sync service (track + adworks relays).
    pub audience_sync_url: String,

    /// Base URL of the mainframe sync service (adwork side-call).
    pub mainframe_sync_url: String,

    /// Path relayed to by `GET /track`.
    pub track_path: String,

    /// Path relayed to by `GET /adwork`.
    pub adwork_path: String,

    /// Path of the adwork side-call.
    pub mainframe_sync_path: String,

    /// TCP/TLS connect timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Deadline for upstream response headers in milliseconds.
    pub response_timeout_ms: u64,

    /// Maximum stall between two body reads in milliseconds.
    pub idle_timeout_ms: u64,
}

impl UpstreamConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            audience_sync_url: "https://cookie-sync-mainframe.herokuapp.com".to_string(),
            mainframe_sync_url: "https://cookie-sync-mainframe.herokuapp.com".to_string(),
            track_path: "/partner-sync".to_string(),
            adwork_path: "/adworks".to_string(),
            mainframe_sync_path: "/mainframe-sync".to_string(),
            connect_timeout_ms: 2_000,
            response_timeout_ms: 5_000,
            idle_timeout_ms: 30_000,
        }
    }
}

/// Cross-origin resource sharing policy.
///
/// Credentials are allowed, so every list must be explicit.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://cookie-sync-audience-service.herokuapp.com".to_string(),
                "https://cookie-sync-publisher.herokuapp.com".to_string(),
            ],
            allowed_headers: [
                "Origin",
                "partner_1_tracking_id",
                "X-Requested-With",
                "Content-Type",
                "Accept",
                "x-audience-tracking-id",
                "x-partner-1-tracking-id",
                "x-contentFocus",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect(),
            allowed_methods: ["POST", "GET", "OPTIONS", "DELETE", "PUT"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allow_credentials: true,
        }
    }
}

/// Visitor identity cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Name of the identity cookie.
    pub cookie_name: String,

    /// Header carrying the identity to upstream services.
    pub forward_header: String,

    /// Cookie `Path` attribute.
    pub path: String,

    /// Optional cookie `Domain` attribute.
    pub domain: Option<String>,

    /// Adds `Secure; SameSite=None` so browsers send the cookie cross-site.
    pub secure: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            cookie_name: "partner_1_tracking_id".to_string(),
            forward_header: "x-partner-1-tracking-id".to_string(),
            path: "/".to_string(),
            domain: None,
            secure: false,
        }
    }
}

/// Mock auction configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BiddingConfig {
    /// Self-identifying `origin` field of every bid.
    pub origin: String,
}

impl Default for BiddingConfig {
    fn default() -> Self {
        Self {
            origin: "https://cookie-sync-partner-1.herokuapp.com".to_string(),
        }
    }
}

/// Static asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// URL prefix the directory is mounted under.
    pub prefix: String,

    /// Local directory served under `prefix`.
    pub root: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            prefix: "/partnerAd".to_string(),
            root: "ads".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Time allowed for any handler to produce response headers, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log output format.
    pub log_format: LogFormat,

    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Bind address of the scrape endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_filter: "cookie_sync_relay=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
