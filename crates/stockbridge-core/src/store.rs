//! The `ShipmentStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `stockbridge-store-sqlite`). [`crate::Tracker`] and the HTTP layer depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  history::{HistoryEvent, NewHistoryEvent},
  shipment::{NewShipment, Shipment},
};

/// Backend errors must say whether they were caused by a tracking code that
/// is already taken, so that creation can retry with a fresh code.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_tracking_code_conflict(&self) -> bool;
}

/// Abstraction over a shipment store backend.
///
/// Shipments are never deleted through the tracker; history is append-only.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ShipmentStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new shipment together with its first history event, atomically.
  ///
  /// The event's `status` should equal `shipment.status`. Fails with an error
  /// for which [`StoreError::is_tracking_code_conflict`] holds if the code is
  /// already taken; nothing is written in that case.
  fn insert_shipment(
    &self,
    shipment: NewShipment,
    first_event: NewHistoryEvent,
  ) -> impl Future<Output = Result<Shipment, Self::Error>> + Send + '_;

  /// Append an event to a shipment's history and overwrite the shipment's
  /// `status` with the event's status, atomically.
  fn append_event(
    &self,
    shipment_id: i64,
    event: NewHistoryEvent,
  ) -> impl Future<Output = Result<HistoryEvent, Self::Error>> + Send + '_;

  /// Look up a shipment by exact, case-sensitive tracking code.
  fn find_by_tracking_code<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Shipment>, Self::Error>> + Send + 'a;

  /// All history events for a shipment, most recent first.
  fn history_for(
    &self,
    shipment_id: i64,
  ) -> impl Future<Output = Result<Vec<HistoryEvent>, Self::Error>> + Send + '_;

  /// Delete a shipment and, by cascade, its history. Returns `false` if no
  /// such shipment existed.
  fn delete_shipment(
    &self,
    shipment_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
