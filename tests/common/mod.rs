//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::http::HeaderMap;
use axum::Router;
use cookie_sync_relay::lifecycle::Shutdown;
use cookie_sync_relay::{HttpServer, RelayConfig};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral local port.
pub async fn start_stub(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An upstream that accepts connections and never answers.
pub async fn start_hung_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

/// A local address with nothing listening on it.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Config pointing both upstreams at local stubs.
pub fn relay_config(audience: SocketAddr, mainframe: SocketAddr) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.upstream.audience_sync_url = format!("http://{audience}");
    config.upstream.mainframe_sync_url = format!("http://{mainframe}");
    config.upstream.connect_timeout_ms = 1_000;
    config.upstream.response_timeout_ms = 2_000;
    config
}

/// Start the relay on an ephemeral port.
pub async fn start_relay(config: RelayConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Headers seen by a stub, in arrival order.
#[derive(Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<HeaderMap>>>,
}

impl Recorder {
    pub fn record(&self, headers: &HeaderMap) {
        self.seen.lock().unwrap().push(headers.clone());
    }

    pub fn all(&self) -> Vec<HeaderMap> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> HeaderMap {
        self.seen.lock().unwrap().last().cloned().expect("stub was never called")
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

/// Value of the identity cookie set by a response, if any.
pub fn minted_identity(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| v.strip_prefix("partner_1_tracking_id="))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}
