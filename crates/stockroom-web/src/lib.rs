//! Web front end for Stockroom.
//!
//! Serves the HTML search page, the gated upload endpoints and an image proxy,
//! and mounts the JSON API under `/api`. Backed by any [`Catalog`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod html;
pub mod metadata;

pub use error::Error;

use std::{sync::Arc, time::Duration};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post, put},
};
use serde::Deserialize;
use stockroom_api::ApiSettings;
use stockroom_core::{card::StockThresholds, catalog::Catalog, query::DEFAULT_PAGE_SIZE};
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use handlers::{image, page, upload};
use metadata::MetadataConfig;

/// Timeout for every outbound request (images, commit metadata).
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_title() -> String { "Super Buscador de Productos".to_string() }
fn default_stock_low() -> i64 { StockThresholds::default().low }
fn default_page_size() -> usize { DEFAULT_PAGE_SIZE }
fn default_upload_username() -> String { "admin".to_string() }

/// Runtime server configuration, deserialised from `config.toml` and
/// `STOCKROOM_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  /// Path or `http(s)://` URL of the catalog spreadsheet.
  pub source:               String,
  #[serde(default = "default_title")]
  pub title:                String,
  /// Stock at or below this (and non-negative) is shown orange.
  #[serde(default = "default_stock_low")]
  pub stock_low:            i64,
  #[serde(default = "default_page_size")]
  pub page_size:            usize,
  #[serde(default = "default_upload_username")]
  pub upload_username:      String,
  /// Argon2 PHC string; uploads are refused while unset.
  #[serde(default)]
  pub upload_password_hash: Option<String>,
  #[serde(default)]
  pub metadata:             Option<MetadataConfig>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<C> {
  pub catalog: Arc<C>,
  pub config:  Arc<ServerConfig>,
  pub auth:    Arc<AuthConfig>,
  pub http:    reqwest::Client,
}

impl<C> Clone for AppState<C> {
  fn clone(&self) -> Self {
    Self {
      catalog: Arc::clone(&self.catalog),
      config:  Arc::clone(&self.config),
      auth:    Arc::clone(&self.auth),
      http:    self.http.clone(),
    }
  }
}

impl<C> AppState<C> {
  pub fn new(catalog: Arc<C>, config: ServerConfig) -> reqwest::Result<Self> {
    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let auth = AuthConfig {
      username:      config.upload_username.clone(),
      password_hash: config.upload_password_hash.clone(),
    };
    Ok(Self {
      catalog,
      config: Arc::new(config),
      auth: Arc::new(auth),
      http,
    })
  }

  pub fn settings(&self) -> ApiSettings {
    ApiSettings {
      thresholds: StockThresholds { low: self.config.stock_low },
      default_page_size: self.config.page_size,
      ..ApiSettings::default()
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<C>(state: AppState<C>) -> Router
where
  C: Catalog + 'static,
{
  let api = stockroom_api::api_router(Arc::clone(&state.catalog), state.settings());
  Router::new()
    .route("/", get(page::handler::<C>))
    .route("/reload", post(page::reload::<C>))
    .route("/products/{code}/image", get(image::handler::<C>))
    .route(
      "/upload",
      put(upload::handler::<C>)
        .post(upload::form::<C>)
        .layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES)),
    )
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}
