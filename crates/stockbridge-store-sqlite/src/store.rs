//! [`SqliteStore`] — the SQLite implementation of [`ShipmentStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use stockbridge_core::{
  history::{HistoryEvent, NewHistoryEvent},
  shipment::{NewShipment, Shipment},
  store::ShipmentStore,
};

use crate::{
  encode::{
    HISTORY_COLUMNS, RawHistoryEvent, RawShipment, encode_dt, insert_event_row,
    insert_shipment_sql, is_unique_violation, shipment_columns, shipment_params,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A shipment store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of shipments on record.
  pub async fn shipment_count(&self) -> Result<i64> {
    let count = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM shipments", [], |r| r.get(0))?)
      })
      .await?;
    Ok(count)
  }
}

// ─── ShipmentStore impl ──────────────────────────────────────────────────────

impl ShipmentStore for SqliteStore {
  type Error = Error;

  async fn insert_shipment(
    &self,
    shipment:    NewShipment,
    first_event: NewHistoryEvent,
  ) -> Result<Shipment> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let sql        = insert_shipment_sql();
    let values     = shipment_params(
      &shipment.tracking_code,
      &shipment.status,
      &at_str,
      &shipment.details,
    );

    // The shipment row and its creation event commit together; on a tracking
    // code conflict the transaction is dropped and nothing is written.
    let inserted: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let id = match tx.execute(&sql, rusqlite::params_from_iter(values.iter())) {
          Ok(_) => tx.last_insert_rowid(),
          Err(e) if is_unique_violation(&e) => return Ok(None),
          Err(e) => return Err(e.into()),
        };
        insert_event_row(&tx, id, &first_event, &at_str)?;
        tx.commit()?;
        Ok(Some(id))
      })
      .await?;

    let id = inserted.ok_or_else(|| {
      Error::DuplicateTrackingCode(shipment.tracking_code.to_string())
    })?;

    Ok(Shipment {
      id,
      tracking_code: shipment.tracking_code,
      status: shipment.status,
      details: shipment.details,
      created_at,
    })
  }

  async fn append_event(
    &self,
    shipment_id: i64,
    event:       NewHistoryEvent,
  ) -> Result<HistoryEvent> {
    let recorded_at = Utc::now();
    let at_str      = encode_dt(recorded_at);
    let row         = event.clone();

    let inserted: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let updated = tx.execute(
          "UPDATE shipments SET status = ?1 WHERE id = ?2",
          rusqlite::params![row.status, shipment_id],
        )?;
        if updated == 0 {
          return Ok(None);
        }
        let id = insert_event_row(&tx, shipment_id, &row, &at_str)?;
        tx.commit()?;
        Ok(Some(id))
      })
      .await?;

    let id = inserted.ok_or(Error::ShipmentNotFound(shipment_id))?;

    Ok(HistoryEvent {
      id,
      shipment_id,
      date: event.date,
      time: event.time,
      location: event.location,
      status: event.status,
      updated_by: event.updated_by,
      remarks: event.remarks,
      recorded_at,
    })
  }

  async fn find_by_tracking_code(&self, code: &str) -> Result<Option<Shipment>> {
    let code = code.to_owned();
    let sql  = format!(
      "SELECT {} FROM shipments WHERE tracking_code = ?1",
      shipment_columns()
    );

    let raw: Option<RawShipment> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![code], RawShipment::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawShipment::into_shipment).transpose()
  }

  async fn history_for(&self, shipment_id: i64) -> Result<Vec<HistoryEvent>> {
    let raws: Vec<RawHistoryEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {HISTORY_COLUMNS} FROM shipment_history
           WHERE shipment_id = ?1
           ORDER BY id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![shipment_id], RawHistoryEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHistoryEvent::into_event).collect()
  }

  async fn delete_shipment(&self, shipment_id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM shipments WHERE id = ?1",
          rusqlite::params![shipment_id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }
}
