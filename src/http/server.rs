//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (panic guard, request ID, tracing, timeout, CORS,
//!   identity)
//! - Bind server to listener and serve until shutdown

use axum::{
    body::Body,
    http::{HeaderName, Response, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{BiddingConfig, RelayConfig};
use crate::forwarder::{Forwarder, ForwarderError};
use crate::handlers::{assets::asset_service, bidding, fallback, relay};
use crate::identity::{assign_identity, IdentityPolicy};
use crate::security::build_cors_layer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    pub bidding: Arc<BiddingConfig>,
}

/// Error type for server setup and serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build forwarder: {0}")]
    Forwarder(#[from] ForwarderError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let state = AppState {
            forwarder: Arc::new(Forwarder::new(&config.upstream, &config.identity)?),
            bidding: Arc::new(config.bidding.clone()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers listed last wrap outermost, so a request meets them bottom-up:
    /// panic guard, request ID, trace, timeout, CORS, identity, then routes.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let identity = Arc::new(IdentityPolicy::new(config.identity.clone()));
        let x_request_id = HeaderName::from_static("x-request-id");

        Router::new()
            .route("/track", get(relay::track))
            .route("/adwork", get(relay::adwork))
            .route("/bidding", get(bidding::bid))
            .nest_service(&config.assets.prefix, asset_service(&config.assets))
            .fallback(fallback::acknowledge)
            .with_state(state)
            .layer(middleware::from_fn_with_state(identity, assign_identity))
            .layer(build_cors_layer(&config.cors))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::GATEWAY_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
            .layer(CatchPanicLayer::custom(handle_panic))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until a
    /// shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            assets_prefix = %self.config.assets.prefix,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Last-resort handler for panics: log, answer 500 with no body.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = %detail, "Handler panicked");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
