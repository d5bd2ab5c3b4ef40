//! Tracking relays.

use axum::{
    extract::{Request, State},
    response::Response,
};

use crate::forwarder::RelayError;
use crate::http::request::SyncContext;
use crate::http::server::AppState;

/// `GET /track?audience_tracking_id=&contentFocus=`
pub async fn track(
    State(state): State<AppState>,
    ctx: SyncContext,
    request: Request,
) -> Result<Response, RelayError> {
    state.forwarder.track(&ctx, request).await
}

/// `GET /adwork?mainframe-tracking-id=`
pub async fn adwork(
    State(state): State<AppState>,
    ctx: SyncContext,
    request: Request,
) -> Result<Response, RelayError> {
    state.forwarder.adwork(&ctx, request).await
}
