//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use stockbridge_core::{
  Tracker,
  history::NewHistoryEvent,
  shipment::{NewShipment, ShipmentDetails},
  store::{ShipmentStore, StoreError as _},
  tracker::{CREATION_REMARKS, CreateShipment, UpdateShipment},
  tracking::TrackingCode,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn code(n: u64) -> TrackingCode {
  TrackingCode::from_stored(format!("AWB{n:012}"))
}

fn new_shipment(code: TrackingCode) -> NewShipment {
  NewShipment {
    tracking_code: code,
    status:        "Pending".into(),
    details:       ShipmentDetails {
      shipper_name: Some("John Smith".into()),
      origin:       Some("London, UK".into()),
      destination:  Some("Milan, Italy".into()),
      weight:       Some("12.5".into()),
      ..Default::default()
    },
  }
}

fn event(status: &str, location: &str) -> NewHistoryEvent {
  NewHistoryEvent {
    date:       Some("2025-03-14".into()),
    time:       Some("09:30 AM".into()),
    location:   Some(location.into()),
    status:     status.into(),
    updated_by: "Admin".into(),
    remarks:    String::new(),
  }
}

// ─── Shipments ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_find_shipment() {
  let s = store().await;

  let created = s
    .insert_shipment(new_shipment(code(1)), event("Pending", "London, UK"))
    .await
    .unwrap();
  assert_eq!(created.tracking_code, code(1));

  let found = s.find_by_tracking_code("AWB000000000001").await.unwrap();
  assert_eq!(found.as_ref(), Some(&created));

  let found = found.unwrap();
  assert_eq!(found.details.shipper_name.as_deref(), Some("John Smith"));
  assert_eq!(found.details.weight.as_deref(), Some("12.5"));
  assert_eq!(found.details.carrier, None);
}

#[tokio::test]
async fn find_missing_returns_none() {
  let s = store().await;
  let result = s.find_by_tracking_code("AWB999999999999").await.unwrap();
  assert!(result.is_none());
  assert_eq!(s.shipment_count().await.unwrap(), 0);
}

#[tokio::test]
async fn insert_writes_creation_event() {
  let s = store().await;
  let created = s
    .insert_shipment(new_shipment(code(1)), event("Pending", "London, UK"))
    .await
    .unwrap();

  let history = s.history_for(created.id).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].shipment_id, created.id);
  assert_eq!(history[0].status, "Pending");
  assert_eq!(history[0].location.as_deref(), Some("London, UK"));
}

#[tokio::test]
async fn duplicate_tracking_code_is_a_conflict_and_writes_nothing() {
  let s = store().await;
  let first = s
    .insert_shipment(new_shipment(code(7)), event("Pending", "London, UK"))
    .await
    .unwrap();

  let err = s
    .insert_shipment(new_shipment(code(7)), event("Pending", "Paris, FR"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateTrackingCode(ref c) if c == "AWB000000000007"));
  assert!(err.is_tracking_code_conflict());

  assert_eq!(s.shipment_count().await.unwrap(), 1);
  assert_eq!(s.history_for(first.id).await.unwrap().len(), 1);
}

// ─── History ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_event_overwrites_status() {
  let s = store().await;
  let created = s
    .insert_shipment(new_shipment(code(1)), event("Pending", "London, UK"))
    .await
    .unwrap();

  let appended = s
    .append_event(created.id, event("In Transit", "Berlin, Germany"))
    .await
    .unwrap();
  assert_eq!(appended.shipment_id, created.id);
  assert_eq!(appended.status, "In Transit");

  let found = s
    .find_by_tracking_code(created.tracking_code.as_str())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.status, "In Transit");
}

#[tokio::test]
async fn history_is_most_recent_first() {
  let s = store().await;
  let created = s
    .insert_shipment(new_shipment(code(1)), event("Pending", "London, UK"))
    .await
    .unwrap();
  for location in ["Dover, UK", "Calais, FR", "Berlin, Germany"] {
    s.append_event(created.id, event("In Transit", location))
      .await
      .unwrap();
  }

  let history = s.history_for(created.id).await.unwrap();
  let locations: Vec<_> = history.iter().filter_map(|e| e.location.as_deref()).collect();
  assert_eq!(locations, ["Berlin, Germany", "Calais, FR", "Dover, UK", "London, UK"]);
  assert!(history.windows(2).all(|w| w[0].id > w[1].id));
}

#[tokio::test]
async fn history_is_scoped_to_its_shipment() {
  let s = store().await;
  let a = s
    .insert_shipment(new_shipment(code(1)), event("Pending", "London, UK"))
    .await
    .unwrap();
  let b = s
    .insert_shipment(new_shipment(code(2)), event("Pending", "Leeds, UK"))
    .await
    .unwrap();
  s.append_event(a.id, event("In Transit", "Dover, UK")).await.unwrap();

  assert_eq!(s.history_for(a.id).await.unwrap().len(), 2);
  assert_eq!(s.history_for(b.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn append_to_missing_shipment_fails() {
  let s = store().await;
  let err = s
    .append_event(404, event("In Transit", "Nowhere"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ShipmentNotFound(404)));
  assert!(!err.is_tracking_code_conflict());
}

// ─── Deletion ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_cascades_to_history() {
  let s = store().await;
  let created = s
    .insert_shipment(new_shipment(code(1)), event("Pending", "London, UK"))
    .await
    .unwrap();
  s.append_event(created.id, event("In Transit", "Dover, UK"))
    .await
    .unwrap();

  assert!(s.delete_shipment(created.id).await.unwrap());
  assert!(s.history_for(created.id).await.unwrap().is_empty());
  assert!(
    s.find_by_tracking_code(created.tracking_code.as_str())
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn delete_missing_returns_false() {
  let s = store().await;
  assert!(!s.delete_shipment(1).await.unwrap());
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn data_survives_reopen() {
  let path = std::env::temp_dir().join(format!(
    "stockbridge-reopen-{}-{}.db",
    std::process::id(),
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
  ));

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert_shipment(new_shipment(code(1)), event("Pending", "London, UK"))
      .await
      .unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let found = s.find_by_tracking_code("AWB000000000001").await.unwrap();
  assert!(found.is_some());
  assert_eq!(s.history_for(found.unwrap().id).await.unwrap().len(), 1);

  drop(s);
  for suffix in ["", "-wal", "-shm"] {
    let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
  }
}

// ─── Tracker over SQLite ─────────────────────────────────────────────────────

#[tokio::test]
async fn tracker_scenario_end_to_end() {
  let tracker = Tracker::new(Arc::new(store().await));

  let created = tracker
    .create(CreateShipment {
      status:  Some("In Transit".into()),
      details: ShipmentDetails {
        shipper_name: Some("John Smith".into()),
        origin:       Some("London, UK".into()),
        destination:  Some("Milan, Italy".into()),
        ..Default::default()
      },
    })
    .await
    .unwrap();
  let code = created.tracking_code.as_str();
  assert!(TrackingCode::is_well_formed(code), "bad code: {code}");

  let tracked = tracker.track(code).await.unwrap();
  assert_eq!(tracked.shipment.tracking_code.as_str(), code);
  assert_eq!(tracked.shipment.status, "In Transit");
  assert_eq!(tracked.shipment.details.origin.as_deref(), Some("London, UK"));
  assert_eq!(tracked.history.len(), 1);
  assert_eq!(tracked.history[0].remarks, CREATION_REMARKS);

  tracker
    .update(code, UpdateShipment {
      location: Some("Berlin, Germany".into()),
      status: Some("In Transit".into()),
      remarks: Some("arrived at sorting center".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  let tracked = tracker.track(code).await.unwrap();
  assert_eq!(tracked.history.len(), 2);
  assert_eq!(tracked.history[0].location.as_deref(), Some("Berlin, Germany"));
  assert_eq!(tracked.history[0].remarks, "arrived at sorting center");
  assert_eq!(tracked.history[1].remarks, CREATION_REMARKS);
}

#[tokio::test]
async fn tracker_retries_past_taken_code() {
  let s = Arc::new(store().await);
  s.insert_shipment(new_shipment(code(1)), event("Pending", "London, UK"))
    .await
    .unwrap();

  let next = std::sync::atomic::AtomicU64::new(1);
  let tracker = Tracker::new(Arc::clone(&s)).with_code_source(move || {
    code(next.fetch_add(1, std::sync::atomic::Ordering::SeqCst))
  });

  let created = tracker.create(CreateShipment::default()).await.unwrap();
  assert_eq!(created.tracking_code, code(2));
  assert_eq!(s.shipment_count().await.unwrap(), 2);
}
