//! Handlers for table-level endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/summary` | Row/column counts and where the table came from |
//! | `GET`  | `/categories` | Distinct category tags, sorted |
//! | `POST` | `/reload` | Drop the cached table; the next read re-loads |

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockroom_core::catalog::Catalog;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
  pub rows:        usize,
  pub columns:     usize,
  /// e.g. `"1083 rows, 13 columns loaded"`.
  pub message:     String,
  pub source:      String,
  pub fingerprint: String,
  pub loaded_at:   DateTime<Utc>,
}

/// `GET /summary`
pub async fn summary<C: Catalog>(
  State(state): State<ApiState<C>>,
) -> Result<Json<Summary>, ApiError> {
  let table = state.catalog.table().await.map_err(ApiError::catalog)?;
  Ok(Json(Summary {
    rows:        table.len(),
    columns:     table.columns.len(),
    message:     table.summary(),
    source:      table.source.clone(),
    fingerprint: table.fingerprint.clone(),
    loaded_at:   table.loaded_at,
  }))
}

/// `GET /categories`
pub async fn categories<C: Catalog>(
  State(state): State<ApiState<C>>,
) -> Result<Json<Vec<String>>, ApiError> {
  let table = state.catalog.table().await.map_err(ApiError::catalog)?;
  Ok(Json(table.categories()))
}

/// `POST /reload` — 204 once the cache is cleared.
pub async fn reload<C: Catalog>(State(state): State<ApiState<C>>) -> StatusCode {
  state.catalog.invalidate();
  StatusCode::NO_CONTENT
}
