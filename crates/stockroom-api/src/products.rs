//! Handlers for `/products` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/products` | Optional `text`, `category`, `prefix`, `sort=recent`, `page`, `page_size` |
//! | `GET`  | `/products/recent` | Optional `limit` (default 100) |
//! | `GET`  | `/products/:code` | Single product; 404 if absent |
//! | `GET`  | `/products/:code/card` | Rendered display card |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use stockroom_core::{
  Error as CoreError,
  card::{self, Card},
  catalog::Catalog,
  product::Product,
  query::{self, DEFAULT_RECENT, Page, ProductQuery, Sort},
};

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Case-insensitive substring of the product name.
  pub text:      Option<String>,
  /// Exact category tag.
  pub category:  Option<String>,
  /// Case-insensitive prefix of the product name.
  pub prefix:    Option<String>,
  pub sort:      Option<Sort>,
  /// 1-based; defaults to 1.
  pub page:      Option<usize>,
  pub page_size: Option<usize>,
}

impl ListParams {
  pub fn into_query(self, default_page_size: usize, max_page_size: usize) -> ProductQuery {
    ProductQuery {
      text:      self.text,
      category:  self.category,
      prefix:    self.prefix,
      sort:      self.sort.unwrap_or_default(),
      page:      self.page.unwrap_or(1),
      page_size: self
        .page_size
        .unwrap_or(default_page_size)
        .min(max_page_size),
    }
  }
}

/// `GET /products[?text=...][&category=...][&prefix=...][&sort=recent][&page=...][&page_size=...]`
pub async fn list<C: Catalog>(
  State(state): State<ApiState<C>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<Product>>, ApiError> {
  let table = state.catalog.table().await.map_err(ApiError::catalog)?;
  let product_query = params.into_query(
    state.settings.default_page_size,
    state.settings.max_page_size,
  );
  let page = query::run(&table, &product_query).map(Product::clone);
  Ok(Json(page))
}

// ─── Recent ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecentParams {
  pub limit: Option<usize>,
}

/// `GET /products/recent[?limit=N]` — newest first; undated products last.
pub async fn recent<C: Catalog>(
  State(state): State<ApiState<C>>,
  Query(params): Query<RecentParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
  let table = state.catalog.table().await.map_err(ApiError::catalog)?;
  let limit = params.limit.unwrap_or(DEFAULT_RECENT);
  Ok(Json(
    query::recent(&table, limit)
      .into_iter()
      .cloned()
      .collect(),
  ))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

fn not_found(e: CoreError) -> ApiError { ApiError::NotFound(e.to_string()) }

/// `GET /products/:code`
pub async fn get_one<C: Catalog>(
  State(state): State<ApiState<C>>,
  Path(code): Path<String>,
) -> Result<Json<Product>, ApiError> {
  let table = state.catalog.table().await.map_err(ApiError::catalog)?;
  let product = table.require(&code).map_err(not_found)?;
  Ok(Json(product.clone()))
}

/// `GET /products/:code/card`
pub async fn card<C: Catalog>(
  State(state): State<ApiState<C>>,
  Path(code): Path<String>,
) -> Result<Json<Card>, ApiError> {
  let table = state.catalog.table().await.map_err(ApiError::catalog)?;
  let product = table.require(&code).map_err(not_found)?;
  Ok(Json(card::render(product, state.settings.thresholds)))
}
