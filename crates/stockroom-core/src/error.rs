//! Error types for `stockroom-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("product not found: {0}")]
  ProductNotFound(String),

  /// A column the table cannot be built without is absent from the header.
  #[error("required column missing: {0}")]
  MissingColumn(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
