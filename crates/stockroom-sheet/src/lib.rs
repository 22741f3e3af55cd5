//! Spreadsheet and CSV codec for Stockroom.
//!
//! Converts raw file bytes into [`stockroom_core`] tables. Pure synchronous;
//! no HTTP or filesystem dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let csv = "Codigo,Nombre,Stock\nA1,Pelota,4\n";
//! let table = stockroom_sheet::decode(csv.as_bytes(), "inline").unwrap();
//! println!("{}", table.summary());
//! ```

mod cell;
pub mod columns;
mod decode;
pub mod error;
mod text;

pub use error::{Error, Result};
pub use text::decode_text;

use stockroom_core::table::Table;

// ─── Format detection ────────────────────────────────────────────────────────

/// The container a byte buffer holds, decided from its content rather than
/// a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
  /// xlsx / ods (zip) or legacy xls (OLE compound file).
  Workbook,
  /// Anything else is treated as delimited text.
  Csv,
}

impl Format {
  const ZIP_MAGIC: &'static [u8] = b"PK\x03\x04";
  const CFB_MAGIC: &'static [u8] = &[0xD0, 0xCF, 0x11, 0xE0];

  pub fn sniff(bytes: &[u8]) -> Self {
    if bytes.starts_with(Self::ZIP_MAGIC) || bytes.starts_with(Self::CFB_MAGIC) {
      Format::Workbook
    } else {
      Format::Csv
    }
  }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Decode a product table from `bytes`.
///
/// `source` is recorded on the table for display. Missing optional columns
/// are tolerated; a missing `code` or `name` column is an error.
pub fn decode(bytes: &[u8], source: &str) -> Result<Table> {
  let raw = decode::read_raw(bytes)?;
  decode::build_table(raw, source, bytes)
}

/// An upload that has been validated and converted to its stored form.
#[derive(Debug)]
pub struct PreparedUpload {
  /// Bytes to write to the backing file.
  pub bytes: Vec<u8>,
  pub format: Format,
  /// The table those bytes decode to.
  pub table: Table,
}

/// Validate an uploaded file and convert it to the form it is stored in.
///
/// Workbooks are stored unchanged. CSV is decoded (UTF-8, or Windows-1252 as a
/// fallback) and re-written as comma-separated UTF-8, so whatever reads the
/// backing file later never has to guess the encoding again.
pub fn prepare_upload(bytes: &[u8], source: &str) -> Result<PreparedUpload> {
  let format = Format::sniff(bytes);
  let stored = match format {
    Format::Workbook => bytes.to_vec(),
    Format::Csv => {
      let raw = decode::read_raw(bytes)?;
      write_csv(&raw)?
    }
  };
  let table = decode(&stored, source)?;
  Ok(PreparedUpload {
    bytes: stored,
    format,
    table,
  })
}

fn write_csv(raw: &decode::RawSheet) -> Result<Vec<u8>> {
  let mut writer = csv::WriterBuilder::new()
    .flexible(true)
    .from_writer(Vec::new());
  writer.write_record(&raw.headers)?;
  for row in &raw.rows {
    writer.write_record(row.iter().map(|c| c.as_text().unwrap_or_default()))?;
  }
  writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

#[cfg(test)]
mod tests;
