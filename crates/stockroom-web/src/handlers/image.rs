//! `GET /products/{code}/image`: proxy a product's picture.
//!
//! Any failure along the way (no URL, unreachable host, upstream error)
//! degrades to a 404 carrying the placeholder text, with no retries.

use axum::{
  extract::{Path, State},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use stockroom_core::catalog::Catalog;

use crate::{AppState, error::Error, html::NO_IMAGE};

fn unavailable() -> Response { (StatusCode::NOT_FOUND, NO_IMAGE).into_response() }

pub async fn handler<C: Catalog>(
  State(state): State<AppState<C>>,
  Path(code): Path<String>,
) -> Result<Response, Error> {
  let table = state
    .catalog
    .table()
    .await
    .map_err(|e| Error::Catalog(Box::new(e)))?;
  let Some(url) = table.get(&code).and_then(|p| p.image_url.clone()) else {
    return Ok(unavailable());
  };

  let upstream = match state
    .http
    .get(&url)
    .send()
    .await
    .and_then(|r| r.error_for_status())
  {
    Ok(r) => r,
    Err(e) => {
      tracing::warn!(%code, %url, error = %e, "image fetch failed");
      return Ok(unavailable());
    }
  };

  let content_type = upstream
    .headers()
    .get(header::CONTENT_TYPE)
    .cloned()
    .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));

  match upstream.bytes().await {
    Ok(bytes) => Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response()),
    Err(e) => {
      tracing::warn!(%code, %url, error = %e, "image body truncated");
      Ok(unavailable())
    }
  }
}
