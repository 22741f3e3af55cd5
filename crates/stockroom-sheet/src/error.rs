//! Error types for the stockroom-sheet codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] stockroom_core::Error),

  #[error("spreadsheet error: {0}")]
  Spreadsheet(#[from] calamine::Error),

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("workbook has no worksheets")]
  NoWorksheet,

  #[error("sheet has no header row")]
  EmptySheet,

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
