//! [`Tracker`] — the create / track / update operations over a
//! [`ShipmentStore`].
//!
//! The tracker owns the lifecycle policy: tracking-code assignment and
//! collision retry, initial status, the creation history entry, and the
//! fallbacks applied to updates. Every status change goes through
//! [`ShipmentStore::append_event`], so it is always paired with exactly one
//! history event.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::{
  Error, Result,
  history::{HistoryEvent, NewHistoryEvent},
  shipment::{NewShipment, Shipment, ShipmentDetails, TrackedShipment},
  store::{ShipmentStore, StoreError as _},
  tracking::TrackingCode,
};

// ─── Policy constants ────────────────────────────────────────────────────────

/// Status of a shipment created without one.
pub const DEFAULT_STATUS: &str = "Pending";
/// Actor recorded when the caller does not name one.
pub const DEFAULT_ACTOR: &str = "Admin";
/// Location of the creation event when the shipment has no origin.
pub const DEFAULT_ORIGIN_LOCATION: &str = "Origin";
/// Remarks of the creation event.
pub const CREATION_REMARKS: &str = "Shipment created";

/// `strftime` format of server-stamped history dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// `strftime` format of server-stamped history times.
pub const TIME_FORMAT: &str = "%I:%M %p";

/// How many freshly generated codes [`Tracker::create`] tries before giving up.
pub const DEFAULT_CODE_ATTEMPTS: u32 = 5;

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`Tracker::create`]. There is no tracking code here: the tracker
/// always generates one.
#[derive(Debug, Clone, Default)]
pub struct CreateShipment {
  /// Defaults to [`DEFAULT_STATUS`].
  pub status:  Option<String>,
  pub details: ShipmentDetails,
}

/// Input to [`Tracker::update`].
#[derive(Debug, Clone, Default)]
pub struct UpdateShipment {
  pub location:   Option<String>,
  /// Defaults to the shipment's current status.
  pub status:     Option<String>,
  /// Defaults to [`DEFAULT_ACTOR`].
  pub updated_by: Option<String>,
  /// Defaults to an empty string.
  pub remarks:    Option<String>,
  /// Overrides the server date when non-empty.
  pub date:       Option<String>,
  /// Overrides the server time when non-empty.
  pub time:       Option<String>,
}

// ─── Tracker ─────────────────────────────────────────────────────────────────

type CodeSource = Arc<dyn Fn() -> TrackingCode + Send + Sync>;
type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Applies shipment operations against a store.
///
/// Cloning is cheap: the store and the injected sources are reference-counted.
pub struct Tracker<S> {
  store:         Arc<S>,
  codes:         CodeSource,
  clock:         Clock,
  code_attempts: u32,
}

impl<S> Clone for Tracker<S> {
  fn clone(&self) -> Self {
    Self {
      store:         Arc::clone(&self.store),
      codes:         Arc::clone(&self.codes),
      clock:         Arc::clone(&self.clock),
      code_attempts: self.code_attempts,
    }
  }
}

impl<S: ShipmentStore> Tracker<S> {
  /// A tracker using random codes and the server's local clock.
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      codes: Arc::new(TrackingCode::generate),
      clock: Arc::new(|| Local::now().naive_local()),
      code_attempts: DEFAULT_CODE_ATTEMPTS,
    }
  }

  /// Bound the number of codes tried per creation; at least one is always
  /// tried.
  pub fn with_code_attempts(mut self, attempts: u32) -> Self {
    self.code_attempts = attempts.max(1);
    self
  }

  /// Replace the tracking-code generator.
  pub fn with_code_source(
    mut self,
    codes: impl Fn() -> TrackingCode + Send + Sync + 'static,
  ) -> Self {
    self.codes = Arc::new(codes);
    self
  }

  /// Replace the clock used to stamp history dates and times.
  pub fn with_clock(
    mut self,
    clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static,
  ) -> Self {
    self.clock = Arc::new(clock);
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Create a shipment and its creation history event.
  ///
  /// A tracking-code conflict reported by the store is retried with a fresh
  /// code, up to the configured number of attempts.
  pub async fn create(&self, input: CreateShipment) -> Result<Shipment> {
    let status = input.status.unwrap_or_else(|| DEFAULT_STATUS.to_owned());
    let (date, time) = self.stamp();
    let first_event = NewHistoryEvent {
      date:       Some(date),
      time:       Some(time),
      location:   Some(
        input
          .details
          .origin
          .clone()
          .unwrap_or_else(|| DEFAULT_ORIGIN_LOCATION.to_owned()),
      ),
      status:     status.clone(),
      updated_by: DEFAULT_ACTOR.to_owned(),
      remarks:    CREATION_REMARKS.to_owned(),
    };

    for attempt in 1..=self.code_attempts {
      let shipment = NewShipment {
        tracking_code: (self.codes)(),
        status:        status.clone(),
        details:       input.details.clone(),
      };
      let code = shipment.tracking_code.clone();

      match self.store.insert_shipment(shipment, first_event.clone()).await {
        Ok(created) => {
          info!(tracking_code = %created.tracking_code, status = %created.status, "shipment created");
          return Ok(created);
        }
        Err(e) if e.is_tracking_code_conflict() => {
          warn!(tracking_code = %code, attempt, "tracking code already taken; retrying");
        }
        Err(e) => return Err(Error::store(e)),
      }
    }

    Err(Error::TrackingCodeExhausted(self.code_attempts))
  }

  /// Look up a shipment and its full history, most recent event first.
  pub async fn track(&self, code: &str) -> Result<TrackedShipment> {
    let shipment = self.find(code).await?;
    let history = self
      .store
      .history_for(shipment.id)
      .await
      .map_err(Error::store)?;
    Ok(TrackedShipment { shipment, history })
  }

  /// Record a status/location change. Returns the appended event.
  pub async fn update(&self, code: &str, input: UpdateShipment) -> Result<HistoryEvent> {
    let shipment = self.find(code).await?;
    let (now_date, now_time) = self.stamp();

    let event = NewHistoryEvent {
      date:       Some(non_empty(input.date).unwrap_or(now_date)),
      time:       Some(non_empty(input.time).unwrap_or(now_time)),
      location:   input.location,
      status:     input.status.unwrap_or(shipment.status),
      updated_by: input.updated_by.unwrap_or_else(|| DEFAULT_ACTOR.to_owned()),
      remarks:    input.remarks.unwrap_or_default(),
    };

    let recorded = self
      .store
      .append_event(shipment.id, event)
      .await
      .map_err(Error::store)?;

    info!(tracking_code = %code, status = %recorded.status, "shipment updated");
    Ok(recorded)
  }

  async fn find(&self, code: &str) -> Result<Shipment> {
    self
      .store
      .find_by_tracking_code(code)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::ShipmentNotFound(code.to_owned()))
  }

  /// The current date and time, formatted for a history event.
  fn stamp(&self) -> (String, String) {
    let now = (self.clock)();
    (now.format(DATE_FORMAT).to_string(), now.format(TIME_FORMAT).to_string())
  }
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.is_empty())
}
