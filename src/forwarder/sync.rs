//! Mainframe side-call made by `GET /adwork`.
//!
//! The call is awaited before the adworks relay starts and its outcome is
//! only logged and counted: it neither gates nor enriches the relay.

use axum::http::{HeaderMap, StatusCode};

use crate::forwarder::client::{set_header, Forwarder, X_MAINFRAME_TRACKING_ID};
use crate::http::request::SyncContext;
use crate::observability::metrics;
use crate::resilience::with_deadline;

/// What happened to the side-call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideCallOutcome {
    /// No mainframe id, or the visitor presented no identity cookie.
    Skipped,
    /// The mainframe answered (any status).
    Synced(StatusCode),
    /// Unreachable or no answer before the deadline.
    Failed,
}

impl SideCallOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Synced(status) if status.is_success() => "synced",
            Self::Synced(_) => "rejected",
            Self::Failed => "failed",
        }
    }
}

impl Forwarder {
    /// Tell the mainframe which identity goes with its tracking id.
    ///
    /// Only identities the client presented are linked; one minted on this
    /// request has nothing on the mainframe side to link to yet.
    pub async fn sync_mainframe(&self, ctx: &SyncContext) -> SideCallOutcome {
        let (Some(mainframe_id), Some(identity)) = (
            &ctx.mainframe_tracking_id,
            ctx.identity.as_ref().filter(|identity| !identity.is_minted()),
        ) else {
            return SideCallOutcome::Skipped;
        };

        let mut headers = HeaderMap::new();
        set_header(&mut headers, X_MAINFRAME_TRACKING_ID, Some(mainframe_id.as_str()));
        set_header(&mut headers, self.identity_header.clone(), Some(identity.as_str()));

        let call = self
            .client
            .get(self.mainframe_sync_url.clone())
            .headers(headers)
            .send();

        let outcome = match with_deadline(self.response_timeout, call).await {
            Ok(Ok(response)) => SideCallOutcome::Synced(response.status()),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, url = %self.mainframe_sync_url, "Mainframe side-call failed");
                SideCallOutcome::Failed
            }
            Err(elapsed) => {
                tracing::warn!(error = %elapsed, url = %self.mainframe_sync_url, "Mainframe side-call timed out");
                SideCallOutcome::Failed
            }
        };

        metrics::record_side_call(outcome.label());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IdentityConfig, UpstreamConfig};
    use crate::identity::VisitorIdentity;

    fn forwarder() -> Forwarder {
        let mut upstream = UpstreamConfig::default();
        upstream.mainframe_sync_url = "http://127.0.0.1:9".into();
        Forwarder::new(&upstream, &IdentityConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_skipped_without_mainframe_id() {
        let ctx = SyncContext {
            identity: Some(VisitorIdentity::presented("v")),
            ..SyncContext::default()
        };
        assert_eq!(forwarder().sync_mainframe(&ctx).await, SideCallOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_skipped_without_identity() {
        let ctx = SyncContext {
            mainframe_tracking_id: Some("m".into()),
            ..SyncContext::default()
        };
        assert_eq!(forwarder().sync_mainframe(&ctx).await, SideCallOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_skipped_for_freshly_minted_identity() {
        let ctx = SyncContext {
            identity: Some(VisitorIdentity::mint()),
            mainframe_tracking_id: Some("m".into()),
            ..SyncContext::default()
        };
        assert_eq!(forwarder().sync_mainframe(&ctx).await, SideCallOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_presented_identity_attempts_side_call() {
        let ctx = SyncContext {
            identity: Some(VisitorIdentity::presented("v")),
            mainframe_tracking_id: Some("m".into()),
            ..SyncContext::default()
        };
        // Nothing listens on the discard port, so the attempt fails.
        assert_eq!(forwarder().sync_mainframe(&ctx).await, SideCallOutcome::Failed);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(SideCallOutcome::Synced(StatusCode::OK).label(), "synced");
        assert_eq!(SideCallOutcome::Synced(StatusCode::NOT_FOUND).label(), "rejected");
        assert_eq!(SideCallOutcome::Failed.label(), "failed");
    }
}
