//! Server assembly for Stockbridge.
//!
//! Loads [`ServerConfig`] and wraps the [`stockbridge_api`] router with the
//! CORS and request-tracing layers.

use std::{path::Path, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, Method, header},
};
use serde::Deserialize;
use stockbridge_core::{Tracker, store::ShipmentStore, tracker::DEFAULT_CODE_ATTEMPTS};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `STOCKBRIDGE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                   String,
  pub port:                   u16,
  pub store_path:             String,
  /// Comma-separated list of allowed origins; empty allows any origin.
  pub cors_allowed_origins:   String,
  /// Codes tried per shipment creation before giving up.
  pub tracking_code_attempts: u32,
}

/// Read configuration from `path` (optional) layered under the environment.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 5000)?
    .set_default("store_path", "shipments.db")?
    .set_default("cors_allowed_origins", "")?
    .set_default("tracking_code_attempts", i64::from(DEFAULT_CODE_ATTEMPTS))?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("STOCKBRIDGE"))
    .build()?
    .try_deserialize()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application: API routes, CORS and request tracing.
pub fn app<S>(tracker: Arc<Tracker<S>>, config: &ServerConfig) -> Router
where
  S: ShipmentStore + 'static,
{
  stockbridge_api::api_router(tracker)
    .layer(cors_layer(&config.cors_allowed_origins))
    .layer(TraceLayer::new_for_http())
}

/// CORS for browser frontends: GET/POST/OPTIONS with a JSON content type.
pub fn cors_layer(allowed_origins: &str) -> CorsLayer {
  let layer = CorsLayer::new()
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers([header::CONTENT_TYPE]);

  let origins: Vec<HeaderValue> = allowed_origins
    .split(',')
    .map(str::trim)
    .filter(|o| !o.is_empty())
    .filter_map(|o| match HeaderValue::from_str(o) {
      Ok(v) => Some(v),
      Err(_) => {
        tracing::warn!(origin = o, "ignoring invalid CORS origin");
        None
      }
    })
    .collect();

  if origins.is_empty() {
    layer.allow_origin(Any)
  } else {
    layer.allow_origin(origins)
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────
