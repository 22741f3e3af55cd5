//! Error type for `stockroom-store-file`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("sheet error: {0}")]
  Sheet(#[from] stockroom_sheet::Error),

  #[error("file not found: {}", .0.display())]
  NotFound(PathBuf),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("HTTP error: {0}")]
  Http(#[from] reqwest::Error),

  /// Uploads can only replace a local file.
  #[error("source {0} is read-only")]
  ReadOnlySource(String),

  #[error("background task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
