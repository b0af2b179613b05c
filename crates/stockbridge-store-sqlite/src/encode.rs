//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Descriptive shipment
//! attributes map one-to-one onto nullable TEXT columns named after
//! [`ShipmentDetails::FIELD_NAMES`].

use chrono::{DateTime, Utc};
use stockbridge_core::{
  history::{HistoryEvent, NewHistoryEvent},
  shipment::{Shipment, ShipmentDetails},
  tracking::TrackingCode,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Column lists ────────────────────────────────────────────────────────────

/// Columns preceding the descriptive attributes in every shipment SELECT.
const SHIPMENT_HEAD: [&str; 4] = ["id", "tracking_code", "status", "created_at"];

/// `SELECT` column list for `shipments`, in [`RawShipment::from_row`] order.
pub fn shipment_columns() -> String {
  SHIPMENT_HEAD
    .iter()
    .chain(ShipmentDetails::FIELD_NAMES.iter())
    .copied()
    .collect::<Vec<_>>()
    .join(", ")
}

/// `INSERT` statement for `shipments`. Parameters are the tracking code,
/// status and creation time followed by [`ShipmentDetails::values`].
pub fn insert_shipment_sql() -> String {
  let columns = ShipmentDetails::FIELD_NAMES.join(", ");
  let placeholders = vec!["?"; 3 + ShipmentDetails::FIELD_NAMES.len()].join(", ");
  format!(
    "INSERT INTO shipments (tracking_code, status, created_at, {columns})
     VALUES ({placeholders})"
  )
}

/// Parameter values for [`insert_shipment_sql`].
pub fn shipment_params(
  code: &TrackingCode,
  status: &str,
  created_at: &str,
  details: &ShipmentDetails,
) -> Vec<Option<String>> {
  let mut values = vec![
    Some(code.as_str().to_owned()),
    Some(status.to_owned()),
    Some(created_at.to_owned()),
  ];
  values.extend(details.values().into_iter().map(|v| v.map(str::to_owned)));
  values
}

/// `SELECT` column list for `shipment_history`, in
/// [`RawHistoryEvent::from_row`] order.
pub const HISTORY_COLUMNS: &str =
  "id, shipment_id, date, time, location, status, updated_by, remarks, recorded_at";

/// Insert one history row and return its id.
pub fn insert_event_row(
  conn: &rusqlite::Connection,
  shipment_id: i64,
  event: &NewHistoryEvent,
  recorded_at: &str,
) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO shipment_history (
       shipment_id, date, time, location, status, updated_by, remarks, recorded_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    rusqlite::params![
      shipment_id,
      event.date,
      event.time,
      event.location,
      event.status,
      event.updated_by,
      event.remarks,
      recorded_at,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Whether `e` is a UNIQUE constraint violation.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `shipments` row.
pub struct RawShipment {
  pub id:            i64,
  pub tracking_code: String,
  pub status:        String,
  pub created_at:    String,
  pub details:       ShipmentDetails,
}

impl RawShipment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let mut details = ShipmentDetails::default();
    for (i, name) in ShipmentDetails::FIELD_NAMES.iter().enumerate() {
      if let Some(slot) = details.field_mut(name) {
        *slot = row.get(SHIPMENT_HEAD.len() + i)?;
      }
    }
    Ok(Self {
      id: row.get(0)?,
      tracking_code: row.get(1)?,
      status: row.get(2)?,
      created_at: row.get(3)?,
      details,
    })
  }

  pub fn into_shipment(self) -> Result<Shipment> {
    Ok(Shipment {
      id:            self.id,
      tracking_code: TrackingCode::from_stored(self.tracking_code),
      status:        self.status,
      details:       self.details,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `shipment_history` row.
pub struct RawHistoryEvent {
  pub id:          i64,
  pub shipment_id: i64,
  pub date:        Option<String>,
  pub time:        Option<String>,
  pub location:    Option<String>,
  pub status:      String,
  pub updated_by:  String,
  pub remarks:     String,
  pub recorded_at: String,
}

impl RawHistoryEvent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      shipment_id: row.get(1)?,
      date:        row.get(2)?,
      time:        row.get(3)?,
      location:    row.get(4)?,
      status:      row.get(5)?,
      updated_by:  row.get(6)?,
      remarks:     row.get(7)?,
      recorded_at: row.get(8)?,
    })
  }

  pub fn into_event(self) -> Result<HistoryEvent> {
    Ok(HistoryEvent {
      id:          self.id,
      shipment_id: self.shipment_id,
      date:        self.date,
      time:        self.time,
      location:    self.location,
      status:      self.status,
      updated_by:  self.updated_by,
      remarks:     self.remarks,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
