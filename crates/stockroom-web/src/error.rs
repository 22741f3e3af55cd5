//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  /// Uploads are switched off because no password hash is configured.
  #[error("uploads are disabled")]
  UploadsDisabled,
  #[error("bad request: {0}")]
  BadRequest(String),
  /// The uploaded file could not be decoded or stored.
  #[error("upload rejected: {0}")]
  Upload(#[source] Box<dyn std::error::Error + Send + Sync>),
  #[error("catalog error: {0}")]
  Catalog(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res =
          (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"stockroom\""),
        );
        res
      }
      Error::UploadsDisabled => {
        (StatusCode::FORBIDDEN, "uploads are disabled").into_response()
      }
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::Upload(e) => {
        (StatusCode::UNPROCESSABLE_ENTITY, format!("upload rejected: {e}"))
          .into_response()
      }
      Error::Catalog(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
      }
    }
  }
}
