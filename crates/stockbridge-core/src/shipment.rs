//! Shipment — one tracking request and its descriptive attributes.
//!
//! All descriptive attributes are optional free text. The only attribute that
//! changes after creation is `status`, and only through
//! [`crate::store::ShipmentStore::append_event`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{history::HistoryEvent, tracking::TrackingCode};

// ─── Details ─────────────────────────────────────────────────────────────────

/// The optional descriptive attributes of a shipment.
///
/// Field names double as JSON keys and SQLite column names; [`FIELD_NAMES`]
/// lists them in declaration order.
///
/// [`FIELD_NAMES`]: ShipmentDetails::FIELD_NAMES
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentDetails {
  pub shipper_name:      Option<String>,
  pub shipper_address:   Option<String>,
  pub receiver_name:     Option<String>,
  pub receiver_address:  Option<String>,
  pub receiver_phone:    Option<String>,
  pub receiver_email:    Option<String>,
  pub origin:            Option<String>,
  pub destination:       Option<String>,
  pub carrier:           Option<String>,
  pub shipment_type:     Option<String>,
  pub shipment_mode:     Option<String>,
  pub weight:            Option<String>,
  pub quantity:          Option<String>,
  pub payment_mode:      Option<String>,
  pub total_freight:     Option<String>,
  pub expected_delivery: Option<String>,
  pub departure_time:    Option<String>,
  pub pickup_date:       Option<String>,
  pub pickup_time:       Option<String>,
  pub comments:          Option<String>,
}

impl ShipmentDetails {
  pub const FIELD_NAMES: [&'static str; 20] = [
    "shipper_name",
    "shipper_address",
    "receiver_name",
    "receiver_address",
    "receiver_phone",
    "receiver_email",
    "origin",
    "destination",
    "carrier",
    "shipment_type",
    "shipment_mode",
    "weight",
    "quantity",
    "payment_mode",
    "total_freight",
    "expected_delivery",
    "departure_time",
    "pickup_date",
    "pickup_time",
    "comments",
  ];

  /// Values in [`Self::FIELD_NAMES`] order.
  pub fn values(&self) -> [Option<&str>; 20] {
    [
      self.shipper_name.as_deref(),
      self.shipper_address.as_deref(),
      self.receiver_name.as_deref(),
      self.receiver_address.as_deref(),
      self.receiver_phone.as_deref(),
      self.receiver_email.as_deref(),
      self.origin.as_deref(),
      self.destination.as_deref(),
      self.carrier.as_deref(),
      self.shipment_type.as_deref(),
      self.shipment_mode.as_deref(),
      self.weight.as_deref(),
      self.quantity.as_deref(),
      self.payment_mode.as_deref(),
      self.total_freight.as_deref(),
      self.expected_delivery.as_deref(),
      self.departure_time.as_deref(),
      self.pickup_date.as_deref(),
      self.pickup_time.as_deref(),
      self.comments.as_deref(),
    ]
  }

  /// Mutable access to a field by name. Returns `None` for unknown names.
  pub fn field_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
    let slot = match name {
      "shipper_name" => &mut self.shipper_name,
      "shipper_address" => &mut self.shipper_address,
      "receiver_name" => &mut self.receiver_name,
      "receiver_address" => &mut self.receiver_address,
      "receiver_phone" => &mut self.receiver_phone,
      "receiver_email" => &mut self.receiver_email,
      "origin" => &mut self.origin,
      "destination" => &mut self.destination,
      "carrier" => &mut self.carrier,
      "shipment_type" => &mut self.shipment_type,
      "shipment_mode" => &mut self.shipment_mode,
      "weight" => &mut self.weight,
      "quantity" => &mut self.quantity,
      "payment_mode" => &mut self.payment_mode,
      "total_freight" => &mut self.total_freight,
      "expected_delivery" => &mut self.expected_delivery,
      "departure_time" => &mut self.departure_time,
      "pickup_date" => &mut self.pickup_date,
      "pickup_time" => &mut self.pickup_time,
      "comments" => &mut self.comments,
      _ => return None,
    };
    Some(slot)
  }
}

// ─── Shipment ────────────────────────────────────────────────────────────────

/// A persisted shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
  /// Store-assigned surrogate key.
  pub id:            i64,
  pub tracking_code: TrackingCode,
  pub status:        String,
  #[serde(flatten)]
  pub details:       ShipmentDetails,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::ShipmentStore::insert_shipment`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewShipment {
  pub tracking_code: TrackingCode,
  pub status:        String,
  pub details:       ShipmentDetails,
}

/// A shipment together with its history, most recent event first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedShipment {
  #[serde(flatten)]
  pub shipment: Shipment,
  pub history:  Vec<HistoryEvent>,
}
