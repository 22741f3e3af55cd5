//! JSON REST API for Stockroom.
//!
//! Exposes an axum [`Router`] backed by any [`stockroom_core::catalog::Catalog`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", stockroom_api::api_router(catalog.clone(), settings))
//! ```

pub mod error;
pub mod products;
pub mod summary;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use stockroom_core::{
  card::StockThresholds,
  catalog::Catalog,
  query::DEFAULT_PAGE_SIZE,
};

pub use error::ApiError;

/// Presentation settings shared by every handler.
#[derive(Debug, Clone, Copy)]
pub struct ApiSettings {
  pub thresholds:        StockThresholds,
  pub default_page_size: usize,
  /// Requests for larger pages are clamped to this.
  pub max_page_size:     usize,
}

impl Default for ApiSettings {
  fn default() -> Self {
    Self {
      thresholds:        StockThresholds::default(),
      default_page_size: DEFAULT_PAGE_SIZE,
      max_page_size:     200,
    }
  }
}

/// State threaded through the API handlers.
pub struct ApiState<C> {
  pub catalog:  Arc<C>,
  pub settings: ApiSettings,
}

impl<C> Clone for ApiState<C> {
  fn clone(&self) -> Self {
    Self {
      catalog:  Arc::clone(&self.catalog),
      settings: self.settings,
    }
  }
}

/// Build a fully-materialised API router for `catalog`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<C>(catalog: Arc<C>, settings: ApiSettings) -> Router<()>
where
  C: Catalog + 'static,
{
  Router::new()
    .route("/summary", get(summary::summary::<C>))
    .route("/categories", get(summary::categories::<C>))
    .route("/reload", post(summary::reload::<C>))
    .route("/products", get(products::list::<C>))
    .route("/products/recent", get(products::recent::<C>))
    .route("/products/{code}", get(products::get_one::<C>))
    .route("/products/{code}/card", get(products::card::<C>))
    .with_state(ApiState { catalog, settings })
}
