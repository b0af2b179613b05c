//! SQL schema for the Stockbridge SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The descriptive shipment columns must match
/// `ShipmentDetails::FIELD_NAMES`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS shipments (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    tracking_code     TEXT NOT NULL UNIQUE,
    status            TEXT NOT NULL,
    created_at        TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    shipper_name      TEXT,
    shipper_address   TEXT,
    receiver_name     TEXT,
    receiver_address  TEXT,
    receiver_phone    TEXT,
    receiver_email    TEXT,
    origin            TEXT,
    destination       TEXT,
    carrier           TEXT,
    shipment_type     TEXT,
    shipment_mode     TEXT,
    weight            TEXT,
    quantity          TEXT,
    payment_mode      TEXT,
    total_freight     TEXT,
    expected_delivery TEXT,
    departure_time    TEXT,
    pickup_date       TEXT,
    pickup_time       TEXT,
    comments          TEXT
);

-- History is strictly append-only.
-- Rows are only ever removed by cascade when their shipment is deleted.
CREATE TABLE IF NOT EXISTS shipment_history (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    shipment_id INTEGER NOT NULL REFERENCES shipments(id) ON DELETE CASCADE,
    date        TEXT,
    time        TEXT,
    location    TEXT,
    status      TEXT NOT NULL,
    updated_by  TEXT NOT NULL,
    remarks     TEXT NOT NULL,
    recorded_at TEXT NOT NULL          -- RFC 3339 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS shipment_history_shipment_idx
    ON shipment_history(shipment_id, id);

PRAGMA user_version = 1;
";
