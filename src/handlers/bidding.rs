//! Mock auction bid.

use axum::{extract::State, Json};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::observability::metrics;

/// A synthetic bid: a fixed self-identifying origin and a uniform score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bid {
    pub origin: String,
    pub bid: f64,
}

impl Bid {
    /// Draw a fresh bid in `[0, 1)`.
    pub fn draw(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
            bid: rand::thread_rng().gen::<f64>(),
        }
    }
}

/// `GET /bidding`
pub async fn bid(State(state): State<AppState>) -> Json<Bid> {
    let bid = Bid::draw(&state.bidding.origin);
    tracing::info!(bid = bid.bid, "Bid issued");
    metrics::record_bid();
    Json(bid)
}
