//! Error types for `stockbridge-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("shipment not found: {0}")]
  ShipmentNotFound(String),

  /// Every generated tracking code collided with an existing shipment.
  #[error("no unused tracking code found after {0} attempts")]
  TrackingCodeExhausted(u32),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
