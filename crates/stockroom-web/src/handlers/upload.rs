//! `PUT /upload` and `POST /upload`: replace the backing catalog file.
//!
//! `PUT` takes the file as the raw body and answers JSON; `POST` takes the
//! page's multipart form and answers HTML. Both sit behind the same gate.

use std::sync::Arc;

use axum::{
  Json,
  body::Body,
  extract::{FromRequest, Multipart, Request, State},
  http::StatusCode,
  response::{Html, IntoResponse, Response},
};
use bytes::Bytes;
use serde::Serialize;
use stockroom_core::{catalog::Catalog, table::Table};

use crate::{AppState, auth::verify_auth, error::Error, html};

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Name of the file input in the page's upload form.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResult {
  pub rows:    usize,
  pub columns: usize,
  pub message: String,
}

async fn collect_body(req: Request<Body>) -> Result<Bytes, Response> {
  axum::body::to_bytes(req.into_body(), MAX_UPLOAD_BYTES)
    .await
    .map_err(|_| {
      (StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into_response()
    })
}

/// Hand `body` to the catalog. Bad uploads are 422; storage failures are 500.
async fn replace_catalog<C: Catalog>(state: &AppState<C>, body: Bytes) -> Result<Arc<Table>, Error> {
  if body.is_empty() {
    return Err(Error::BadRequest("empty upload".to_string()));
  }
  match state.catalog.replace(body.to_vec()).await {
    Ok(table) => {
      tracing::info!(rows = table.len(), source = %table.source, "catalog replaced by upload");
      Ok(table)
    }
    Err(e) if C::is_rejection(&e) => {
      tracing::warn!(error = %e, "upload rejected");
      Err(Error::Upload(Box::new(e)))
    }
    Err(e) => {
      tracing::error!(error = %e, "upload could not be stored");
      Err(Error::Catalog(Box::new(e)))
    }
  }
}

pub async fn handler<C: Catalog>(
  State(state): State<AppState<C>>,
  req: Request<Body>,
) -> Response {
  if let Err(e) = verify_auth(req.headers(), &state.auth) {
    return e.into_response();
  }
  let body = match collect_body(req).await {
    Ok(b) => b,
    Err(r) => return r,
  };

  match replace_catalog(&state, body).await {
    Ok(table) => Json(UploadResult {
      rows:    table.len(),
      columns: table.columns.len(),
      message: table.summary(),
    })
    .into_response(),
    Err(e) => e.into_response(),
  }
}

/// The contents of the `file` field, if the form has one.
async fn file_field(mut multipart: Multipart) -> Result<Option<Bytes>, Error> {
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| Error::BadRequest(e.body_text()))?
  {
    if field.name() == Some(FILE_FIELD) {
      let bytes = field
        .bytes()
        .await
        .map_err(|e| Error::BadRequest(e.body_text()))?;
      return Ok(Some(bytes));
    }
  }
  Ok(None)
}

pub async fn form<C: Catalog + 'static>(
  State(state): State<AppState<C>>,
  req: Request<Body>,
) -> Response {
  // Checked before the body is parsed so a bare POST still gets the
  // challenge the browser answers with a login prompt.
  if let Err(e) = verify_auth(req.headers(), &state.auth) {
    return e.into_response();
  }
  let multipart = match Multipart::from_request(req, &state).await {
    Ok(m) => m,
    Err(rejection) => return rejection.into_response(),
  };

  let body = match file_field(multipart).await {
    Ok(Some(body)) => body,
    Ok(None) => {
      return Error::BadRequest(format!("missing `{FILE_FIELD}` field")).into_response();
    }
    Err(e) => return e.into_response(),
  };

  match replace_catalog(&state, body).await {
    Ok(table) => Html(html::render_upload_result(&state.config.title, &table.summary()))
      .into_response(),
    Err(e) => e.into_response(),
  }
}
