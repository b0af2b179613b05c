//! Request bodies as loose field-value mappings.
//!
//! Bodies are JSON objects whose values may be strings, numbers or booleans;
//! all are kept as their string form. `null` means the field is absent and
//! unknown keys are ignored, including any caller-supplied `tracking_code`.

use serde_json::{Map, Value};
use stockbridge_core::{
  shipment::ShipmentDetails,
  tracker::{CreateShipment, UpdateShipment},
};

use crate::error::ApiError;

/// A JSON object body.
#[derive(Debug, Default)]
pub struct FieldMap(Map<String, Value>);

impl TryFrom<Value> for FieldMap {
  type Error = ApiError;

  fn try_from(value: Value) -> Result<Self, ApiError> {
    match value {
      Value::Object(map) => Ok(Self(map)),
      _ => Err(ApiError::BadRequest("Request body must be a JSON object".to_owned())),
    }
  }
}

impl FieldMap {
  /// The string form of `key`, or `None` if absent or `null`.
  pub fn text(&self, key: &str) -> Result<Option<String>, ApiError> {
    match self.0.get(key) {
      None | Some(Value::Null) => Ok(None),
      Some(Value::String(s)) => Ok(Some(s.clone())),
      Some(Value::Number(n)) => Ok(Some(n.to_string())),
      Some(Value::Bool(b)) => Ok(Some(b.to_string())),
      Some(Value::Array(_) | Value::Object(_)) => Err(ApiError::BadRequest(format!(
        "Field `{key}` must be a string or a number"
      ))),
    }
  }

  pub fn into_create(self) -> Result<CreateShipment, ApiError> {
    let mut details = ShipmentDetails::default();
    for name in ShipmentDetails::FIELD_NAMES {
      if let Some(slot) = details.field_mut(name) {
        *slot = self.text(name)?;
      }
    }
    Ok(CreateShipment { status: self.text("status")?, details })
  }

  pub fn into_update(self) -> Result<UpdateShipment, ApiError> {
    Ok(UpdateShipment {
      location:   self.text("location")?,
      status:     self.text("status")?,
      updated_by: self.text("updated_by")?,
      remarks:    self.text("remarks")?,
      date:       self.text("date")?,
      time:       self.text("time")?,
    })
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn fields(value: Value) -> FieldMap { FieldMap::try_from(value).unwrap() }

  #[test]
  fn numbers_and_booleans_become_strings() {
    let map = fields(json!({ "weight": 12.5, "quantity": 3, "comments": true }));
    let create = map.into_create().unwrap();
    assert_eq!(create.details.weight.as_deref(), Some("12.5"));
    assert_eq!(create.details.quantity.as_deref(), Some("3"));
    assert_eq!(create.details.comments.as_deref(), Some("true"));
  }

  #[test]
  fn null_and_missing_are_absent() {
    let create = fields(json!({ "origin": null })).into_create().unwrap();
    assert_eq!(create.details.origin, None);
    assert_eq!(create.status, None);
  }

  #[test]
  fn caller_tracking_code_is_ignored() {
    let create = fields(json!({ "tracking_code": "AWB000000000001", "carrier": "DHL" }))
      .into_create()
      .unwrap();
    assert_eq!(create.details.carrier.as_deref(), Some("DHL"));
  }

  #[test]
  fn nested_values_are_rejected() {
    let err = fields(json!({ "origin": ["London"] })).into_create().unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(ref m) if m.contains("origin")));

    let err = fields(json!({ "status": { "code": 1 } })).into_update().unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
  }

  #[test]
  fn non_object_bodies_are_rejected() {
    assert!(FieldMap::try_from(json!(["status"])).is_err());
    assert!(FieldMap::try_from(json!("status")).is_err());
    assert!(FieldMap::try_from(Value::Null).is_err());
  }

  #[test]
  fn update_reads_all_fields() {
    let update = fields(json!({
      "location": "Berlin, Germany",
      "status": "In Transit",
      "updated_by": "Depot 7",
      "remarks": "arrived at sorting center",
      "date": "2025-03-14",
      "time": "04:05 PM",
    }))
    .into_update()
    .unwrap();
    assert_eq!(update.location.as_deref(), Some("Berlin, Germany"));
    assert_eq!(update.updated_by.as_deref(), Some("Depot 7"));
    assert_eq!(update.time.as_deref(), Some("04:05 PM"));
  }
}
