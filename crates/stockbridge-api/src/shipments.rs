//! Handlers for the shipment endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Liveness message |
//! | `POST` | `/create_shipment` | Body: field mapping; returns 201 + generated code |
//! | `GET`  | `/track_shipment/{code}` | Shipment + history, newest first |
//! | `POST` | `/update_shipment/{code}` | Body: `location`, `status`, `updated_by`, `remarks`, `date`, `time` |
//! | `GET`  | `/debug_history/{code}` | History in insertion order, with a count |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Serialize;
use serde_json::Value;
use stockbridge_core::{
  Tracker,
  history::HistoryEvent,
  shipment::TrackedShipment,
  store::ShipmentStore,
  tracking::TrackingCode,
};

use crate::{error::ApiError, fields::FieldMap};

pub const HOME_MESSAGE: &str = "Stockbridge Express Backend Active";
pub const CREATED_MESSAGE: &str = "Shipment created successfully";
pub const UPDATED_MESSAGE: &str = "Shipment updated successfully";

// ─── Response bodies ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Message {
  pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Created {
  pub message:       &'static str,
  pub tracking_code: TrackingCode,
}

#[derive(Debug, Serialize)]
pub struct DebugHistory {
  pub shipment_id:     i64,
  pub history_count:   usize,
  /// Oldest first.
  pub history_records: Vec<HistoryEvent>,
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `GET /`
pub async fn home() -> Json<Message> { Json(Message { message: HOME_MESSAGE }) }

/// `POST /create_shipment`: 201 with `{message, tracking_code}`.
pub async fn create<S>(
  State(tracker): State<Arc<Tracker<S>>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShipmentStore + 'static,
{
  let Json(value) = body?;
  let input = FieldMap::try_from(value)?.into_create()?;
  let shipment = tracker.create(input).await?;
  Ok((
    StatusCode::CREATED,
    Json(Created {
      message:       CREATED_MESSAGE,
      tracking_code: shipment.tracking_code,
    }),
  ))
}

/// `GET /track_shipment/{code}`
pub async fn track<S>(
  State(tracker): State<Arc<Tracker<S>>>,
  Path(code): Path<String>,
) -> Result<Json<TrackedShipment>, ApiError>
where
  S: ShipmentStore + 'static,
{
  Ok(Json(tracker.track(&code).await?))
}

/// `POST /update_shipment/{code}`: `{message}`.
pub async fn update<S>(
  State(tracker): State<Arc<Tracker<S>>>,
  Path(code): Path<String>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Message>, ApiError>
where
  S: ShipmentStore + 'static,
{
  let Json(value) = body?;
  let input = FieldMap::try_from(value)?.into_update()?;
  tracker.update(&code, input).await?;
  Ok(Json(Message { message: UPDATED_MESSAGE }))
}

/// `GET /debug_history/{code}`
pub async fn debug_history<S>(
  State(tracker): State<Arc<Tracker<S>>>,
  Path(code): Path<String>,
) -> Result<Json<DebugHistory>, ApiError>
where
  S: ShipmentStore + 'static,
{
  let TrackedShipment { shipment, mut history } = tracker.track(&code).await?;
  history.reverse();
  Ok(Json(DebugHistory {
    shipment_id:     shipment.id,
    history_count:   history.len(),
    history_records: history,
  }))
}
