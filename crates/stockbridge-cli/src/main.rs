//! `stockbridge` — operator command line for the Stockbridge tracking API.
//!
//! # Usage
//!
//! ```
//! stockbridge create --status "In Transit" -f origin="London, UK" -f destination="Milan, Italy"
//! stockbridge track AWB824373517914
//! stockbridge update AWB824373517914 --location "Berlin, Germany" --remarks "arrived at sorting center"
//! ```

mod client;

use std::{fmt::Write as _, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use serde_json::{Map, Value};
use stockbridge_core::shipment::{ShipmentDetails, TrackedShipment};

const DEFAULT_URL: &str = "http://localhost:5000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "stockbridge", about = "Command line for the Stockbridge tracking API")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the Stockbridge server (default: http://localhost:5000).
  #[arg(long, env = "STOCKBRIDGE_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create a shipment and print its tracking code.
  Create {
    /// Initial status (server default: Pending).
    #[arg(long)]
    status: Option<String>,

    /// Shipment attribute, e.g. `-f origin="London, UK"`. Repeatable.
    #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    fields: Vec<(String, String)>,
  },

  /// Show a shipment and its history.
  Track {
    code: String,

    /// Print the raw JSON instead of a summary.
    #[arg(long)]
    json: bool,
  },

  /// Record a status/location change.
  Update {
    code: String,

    /// New status (server default: unchanged).
    #[arg(long)]
    status: Option<String>,

    #[arg(long)]
    location: Option<String>,

    /// Actor recorded on the event (server default: Admin).
    #[arg(long = "by")]
    updated_by: Option<String>,

    #[arg(long)]
    remarks: Option<String>,

    /// Event date; the server stamps today's date when omitted.
    #[arg(long)]
    date: Option<String>,

    /// Event time; the server stamps the current time when omitted.
    #[arg(long)]
    time: Option<String>,
  },
}

/// Parse a `KEY=VALUE` shipment attribute, rejecting unknown keys.
fn parse_field(raw: &str) -> Result<(String, String), String> {
  let (key, value) = raw
    .split_once('=')
    .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
  let key = key.trim();
  if !ShipmentDetails::FIELD_NAMES.contains(&key) {
    return Err(format!(
      "unknown field {key:?}; expected one of: {}",
      ShipmentDetails::FIELD_NAMES.join(", ")
    ));
  }
  Ok((key.to_owned(), value.to_owned()))
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
  };
  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Create { status, fields } => {
      let mut body: Map<String, Value> = fields
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
      insert_opt(&mut body, "status", status);
      let code = client.create(&body).await?;
      println!("{code}");
    }
    Command::Track { code, json } => {
      let tracked = client.track(&code).await?;
      if json {
        println!("{}", serde_json::to_string_pretty(&tracked)?);
      } else {
        print!("{}", render(&tracked));
      }
    }
    Command::Update { code, status, location, updated_by, remarks, date, time } => {
      let mut body = Map::new();
      insert_opt(&mut body, "status", status);
      insert_opt(&mut body, "location", location);
      insert_opt(&mut body, "updated_by", updated_by);
      insert_opt(&mut body, "remarks", remarks);
      insert_opt(&mut body, "date", date);
      insert_opt(&mut body, "time", time);
      let message = client.update(&code, &body).await?;
      println!("{message}");
    }
  }

  Ok(())
}

fn insert_opt(body: &mut Map<String, Value>, key: &str, value: Option<String>) {
  if let Some(v) = value {
    body.insert(key.to_owned(), Value::String(v));
  }
}

// ─── Rendering ────────────────────────────────────────────────────────────────

/// Human-readable summary of a shipment and its history.
fn render(tracked: &TrackedShipment) -> String {
  let shipment = &tracked.shipment;
  let mut out = String::new();
  let _ = writeln!(out, "{}  {}", shipment.tracking_code, shipment.status);

  let details = shipment.details.values();
  for (name, value) in ShipmentDetails::FIELD_NAMES.iter().zip(details) {
    if let Some(v) = value {
      let _ = writeln!(out, "  {name:<18} {v}");
    }
  }

  let _ = writeln!(out, "History (newest first):");
  for e in &tracked.history {
    let when = [e.date.as_deref(), e.time.as_deref()]
      .into_iter()
      .flatten()
      .collect::<Vec<_>>()
      .join(" ");
    let _ = write!(
      out,
      "  {when:<19} {:<20} {:<12} [{}]",
      e.location.as_deref().unwrap_or("-"),
      e.status,
      e.updated_by
    );
    if !e.remarks.is_empty() {
      let _ = write!(out, " {}", e.remarks);
    }
    out.push('\n');
  }
  out
}
