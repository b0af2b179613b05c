//! Core types and trait definitions for the Stockbridge shipment tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::ShipmentStore`]; the [`Tracker`] applies
//! the create / track / update operations on top of any such backend.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod history;
pub mod shipment;
pub mod store;
pub mod tracker;
pub mod tracking;

pub use error::{Error, Result};
pub use tracker::Tracker;
