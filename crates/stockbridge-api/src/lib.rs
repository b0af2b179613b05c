//! JSON HTTP API for the Stockbridge shipment tracker.
//!
//! Exposes an axum [`Router`] backed by a [`Tracker`] over any
//! [`ShipmentStore`]. CORS, tracing and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = stockbridge_api::api_router(Arc::new(Tracker::new(store)));
//! ```

pub mod error;
pub mod fields;
pub mod shipments;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use stockbridge_core::{Tracker, store::ShipmentStore};

pub use error::ApiError;

/// Build the API router for `tracker`.
///
/// The returned `Router<()>` can be nested or merged into any parent router
/// regardless of its own state type.
pub fn api_router<S>(tracker: Arc<Tracker<S>>) -> Router<()>
where
  S: ShipmentStore + 'static,
{
  Router::new()
    .route("/", get(shipments::home))
    .route("/create_shipment", post(shipments::create::<S>))
    .route("/track_shipment/{code}", get(shipments::track::<S>))
    .route("/update_shipment/{code}", post(shipments::update::<S>))
    .route("/debug_history/{code}", get(shipments::debug_history::<S>))
    .with_state(tracker)
}

// ─── Integration tests ────────────────────────────────────────────────────────
