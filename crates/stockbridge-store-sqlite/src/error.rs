//! Error type for `stockbridge-store-sqlite`.

use stockbridge_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The UNIQUE constraint on `shipments.tracking_code` rejected an insert.
  #[error("tracking code already in use: {0}")]
  DuplicateTrackingCode(String),

  /// Attempted to append history to a shipment that does not exist.
  #[error("shipment not found: {0}")]
  ShipmentNotFound(i64),
}

impl StoreError for Error {
  fn is_tracking_code_conflict(&self) -> bool {
    matches!(self, Error::DuplicateTrackingCode(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
