//! Async HTTP client wrapping the Stockbridge JSON API.

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use stockbridge_core::shipment::TrackedShipment;

/// Connection settings for the Stockbridge API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the Stockbridge JSON API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Deserialize)]
struct MessageBody {
  message: String,
}

#[derive(Deserialize)]
struct CreatedBody {
  tracking_code: String,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `POST /create_shipment`, returning the generated tracking code.
  pub async fn create(&self, fields: &Map<String, Value>) -> Result<String> {
    let resp = self
      .client
      .post(self.url("/create_shipment"))
      .json(fields)
      .send()
      .await
      .context("POST /create_shipment failed")?;

    let resp = check(resp, "POST /create_shipment").await?;
    let body: CreatedBody = resp.json().await.context("deserialising created shipment")?;
    Ok(body.tracking_code)
  }

  /// `GET /track_shipment/{code}`
  pub async fn track(&self, code: &str) -> Result<TrackedShipment> {
    let resp = self
      .client
      .get(self.url(&format!("/track_shipment/{code}")))
      .send()
      .await
      .context("GET /track_shipment failed")?;

    let resp = check(resp, "GET /track_shipment").await?;
    resp.json().await.context("deserialising shipment")
  }

  /// `POST /update_shipment/{code}`, returning the server's confirmation.
  pub async fn update(&self, code: &str, fields: &Map<String, Value>) -> Result<String> {
    let resp = self
      .client
      .post(self.url(&format!("/update_shipment/{code}")))
      .json(fields)
      .send()
      .await
      .context("POST /update_shipment failed")?;

    let resp = check(resp, "POST /update_shipment").await?;
    let body: MessageBody = resp.json().await.context("deserialising confirmation")?;
    Ok(body.message)
  }
}

/// Pass successful responses through; turn failures into an error carrying
/// the server's `message`, if it sent one.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  match resp.json::<MessageBody>().await {
    Ok(body) => Err(anyhow!("{what} → {status}: {}", body.message)),
    Err(_) => Err(anyhow!("{what} → {status}")),
  }
}
