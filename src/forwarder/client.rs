//! Streaming relay to the audience sync service.

use axum::{
    body::HttpBody,
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    response::Response,
};
use std::time::{Duration, Instant};
use url::Url;

use crate::config::{IdentityConfig, UpstreamConfig};
use crate::forwarder::error::{ForwarderError, RelayError};
use crate::http::request::SyncContext;
use crate::http::response::relay_response;
use crate::observability::metrics;
use crate::resilience::with_deadline;
use crate::security::upstream_request_headers;

pub const X_AUDIENCE_TRACKING_ID: HeaderName = HeaderName::from_static("x-audience-tracking-id");
pub const X_CONTENT_FOCUS: HeaderName = HeaderName::from_static("x-contentfocus");
pub const X_ORIGINAL_IP: HeaderName = HeaderName::from_static("x-original-ip");
pub const X_MAINFRAME_TRACKING_ID: HeaderName = HeaderName::from_static("x-mainframe-tracking-id");

pub const ROUTE_TRACK: &str = "track";
pub const ROUTE_ADWORK: &str = "adwork";

/// Relays tracking traffic to the upstream sync services.
///
/// Holds a single pooled client; cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Forwarder {
    pub(crate) client: reqwest::Client,
    track_url: Url,
    adwork_url: Url,
    pub(crate) mainframe_sync_url: Url,
    pub(crate) response_timeout: Duration,
    pub(crate) identity_header: HeaderName,
}

impl Forwarder {
    pub fn new(upstream: &UpstreamConfig, identity: &IdentityConfig) -> Result<Self, ForwarderError> {
        let client = reqwest::Client::builder()
            .connect_timeout(upstream.connect_timeout())
            .read_timeout(upstream.idle_timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let identity_header = HeaderName::try_from(identity.forward_header.as_str())
            .map_err(|_| ForwarderError::InvalidHeaderName(identity.forward_header.clone()))?;

        Ok(Self {
            client,
            track_url: endpoint(&upstream.audience_sync_url, &upstream.track_path)?,
            adwork_url: endpoint(&upstream.audience_sync_url, &upstream.adwork_path)?,
            mainframe_sync_url: endpoint(&upstream.mainframe_sync_url, &upstream.mainframe_sync_path)?,
            response_timeout: upstream.response_timeout(),
            identity_header,
        })
    }

    /// `GET /track`: relay to the partner-sync endpoint with the visitor's
    /// identity, audience id, content focus and client IP attached.
    pub async fn track(&self, ctx: &SyncContext, request: Request) -> Result<Response, RelayError> {
        let mut extra = HeaderMap::new();
        set_header(&mut extra, X_AUDIENCE_TRACKING_ID, ctx.audience_tracking_id.as_deref());
        set_header(&mut extra, self.identity_header.clone(), identity_value(ctx));
        set_header(&mut extra, X_CONTENT_FOCUS, ctx.content_focus.as_deref());
        set_header(&mut extra, X_ORIGINAL_IP, ctx.client_ip.as_deref());

        self.relay(ROUTE_TRACK, &self.track_url, extra, request).await
    }

    /// `GET /adwork`: run the mainframe side-call (awaited, result discarded),
    /// then relay to the adworks endpoint.
    pub async fn adwork(&self, ctx: &SyncContext, request: Request) -> Result<Response, RelayError> {
        let outcome = self.sync_mainframe(ctx).await;
        tracing::debug!(outcome = ?outcome, "Mainframe side-call finished");

        let mut extra = HeaderMap::new();
        set_header(&mut extra, X_MAINFRAME_TRACKING_ID, ctx.mainframe_tracking_id.as_deref());
        set_header(&mut extra, self.identity_header.clone(), identity_value(ctx));
        set_header(&mut extra, X_ORIGINAL_IP, ctx.client_ip.as_deref());

        self.relay(ROUTE_ADWORK, &self.adwork_url, extra, request).await
    }

    /// Stream `request` to `target` and stream the answer back.
    async fn relay(
        &self,
        route: &'static str,
        target: &Url,
        extra: HeaderMap,
        request: Request,
    ) -> Result<Response, RelayError> {
        let start = Instant::now();
        let (parts, body) = request.into_parts();

        let mut headers = upstream_request_headers(&parts.headers);
        for name in self.managed_headers() {
            headers.remove(&name);
        }
        headers.extend(extra);

        let mut upstream = self
            .client
            .request(parts.method.clone(), target.clone())
            .headers(headers);
        if body.size_hint().exact() != Some(0) {
            upstream = upstream.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        tracing::debug!(route, target = %target, method = %parts.method, "Relaying request");

        let response = match with_deadline(self.response_timeout, upstream.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                metrics::record_request(route, 502, start);
                return Err(RelayError::from_send(route, e, self.response_timeout));
            }
            Err(elapsed) => {
                metrics::record_request(route, 504, start);
                return Err(RelayError::Timeout {
                    route,
                    after: elapsed.0,
                });
            }
        };

        let status = response.status();
        metrics::record_request(route, status.as_u16(), start);
        tracing::info!(
            route,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream responded"
        );

        Ok(relay_response(response, route))
    }

    /// Headers this relay owns; inbound copies are never forwarded.
    fn managed_headers(&self) -> [HeaderName; 5] {
        [
            X_AUDIENCE_TRACKING_ID,
            X_CONTENT_FOCUS,
            X_ORIGINAL_IP,
            X_MAINFRAME_TRACKING_ID,
            self.identity_header.clone(),
        ]
    }
}

fn endpoint(base: &str, path: &str) -> Result<Url, ForwarderError> {
    Url::parse(base)
        .and_then(|url| url.join(path))
        .map_err(|source| ForwarderError::InvalidUrl {
            url: format!("{base}{path}"),
            source,
        })
}

fn identity_value(ctx: &SyncContext) -> Option<&str> {
    ctx.identity.as_ref().map(|identity| identity.as_str())
}

/// Insert `value` under `name` when present. Values that cannot travel as a
/// header are skipped, never rejected.
pub(crate) fn set_header(headers: &mut HeaderMap, name: HeaderName, value: Option<&str>) {
    let Some(value) = value else { return };
    match HeaderValue::from_bytes(value.as_bytes()) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => {
            tracing::warn!(header = %name, "Skipping value that cannot be sent as a header");
        }
    }
}
