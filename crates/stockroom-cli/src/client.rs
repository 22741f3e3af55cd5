//! Async HTTP client wrapping the Stockroom JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use stockroom_core::{
  card::Card,
  product::Product,
  query::{Page, ProductQuery},
};

/// Connection settings for the Stockroom API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the Stockroom JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
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
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    path: &str,
    req: reqwest::RequestBuilder,
  ) -> Result<T> {
    let resp = req
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    if !resp.status().is_success() {
      let status = resp.status();
      let message = resp
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_owned))
        .unwrap_or_default();
      return Err(anyhow!("GET {path} → {status} {message}"));
    }
    resp
      .json()
      .await
      .with_context(|| format!("deserialising {path}"))
  }

  /// `GET /api/summary`, reduced to its one-line message.
  pub async fn summary(&self) -> Result<String> {
    let body: Value = self
      .get_json("/summary", self.client.get(self.url("/summary")))
      .await?;
    Ok(body["message"].as_str().unwrap_or_default().to_owned())
  }

  /// `GET /api/products?...`
  pub async fn list_products(&self, query: &ProductQuery) -> Result<Page<Product>> {
    self
      .get_json("/products", self.client.get(self.url("/products")).query(query))
      .await
  }

  /// `GET /api/categories`
  pub async fn categories(&self) -> Result<Vec<String>> {
    self
      .get_json("/categories", self.client.get(self.url("/categories")))
      .await
  }

  /// `GET /api/products/{code}/card`
  pub async fn card(&self, code: &str) -> Result<Card> {
    let path = format!("/products/{code}/card");
    let req = self.client.get(self.url(&path));
    self.get_json(&path, req).await
  }

  /// `POST /api/reload`
  pub async fn reload(&self) -> Result<()> {
    let resp = self
      .client
      .post(self.url("/reload"))
      .send()
      .await
      .context("POST /reload failed")?;
    if !resp.status().is_success() {
      return Err(anyhow!("POST /reload → {}", resp.status()));
    }
    Ok(())
  }
}
