//! History events — the append-only audit log of a shipment.
//!
//! Events are never updated or deleted individually; they disappear only when
//! their owning shipment is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
  /// Store-assigned; increases with insertion order.
  pub id:          i64,
  pub shipment_id: i64,
  /// Free-text calendar date, e.g. `2025-03-14`.
  pub date:        Option<String>,
  /// Free-text wall-clock time, e.g. `04:05 PM`.
  pub time:        Option<String>,
  pub location:    Option<String>,
  pub status:      String,
  pub updated_by:  String,
  pub remarks:     String,
  /// Server-assigned timestamp; never changes after creation.
  pub recorded_at: DateTime<Utc>,
}

/// Input to [`crate::store::ShipmentStore::append_event`].
#[derive(Debug, Clone)]
pub struct NewHistoryEvent {
  pub date:       Option<String>,
  pub time:       Option<String>,
  pub location:   Option<String>,
  /// Also written to the owning shipment's `status`.
  pub status:     String,
  pub updated_by: String,
  pub remarks:    String,
}
