//! Bytes → raw sheet → [`Table`].

use std::io::Cursor;

use calamine::Reader as _;
use chrono::Utc;
use sha2::{Digest, Sha256};
use stockroom_core::{
  product::{Field, Product},
  table::Table,
};

use crate::{
  Error, Format, Result,
  cell::Cell,
  columns::ColumnMap,
  text::decode_text,
};

/// A header row plus data rows, before any field mapping.
#[derive(Debug, Clone)]
pub(crate) struct RawSheet {
  pub headers: Vec<String>,
  pub rows:    Vec<Vec<Cell>>,
}

// ─── Readers ─────────────────────────────────────────────────────────────────

pub(crate) fn read_raw(bytes: &[u8]) -> Result<RawSheet> {
  match Format::sniff(bytes) {
    Format::Workbook => read_workbook(bytes),
    Format::Csv => read_csv(&decode_text(bytes)),
  }
}

/// First worksheet of an xlsx/xls/ods workbook; the first row is the header.
fn read_workbook(bytes: &[u8]) -> Result<RawSheet> {
  let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
  let range = workbook.worksheet_range_at(0).ok_or(Error::NoWorksheet)??;

  let mut rows = range.rows();
  let headers = rows
    .next()
    .ok_or(Error::EmptySheet)?
    .iter()
    .map(|c| Cell::from_calamine(c).as_text().unwrap_or_default())
    .collect();
  let rows = rows
    .map(|r| r.iter().map(Cell::from_calamine).collect())
    .collect();

  Ok(RawSheet { headers, rows })
}

/// Pick `;` when the header line has more semicolons than commas, as
/// spreadsheet exports in Spanish locales do.
fn sniff_delimiter(text: &str) -> u8 {
  let header = text.lines().next().unwrap_or_default();
  if header.matches(';').count() > header.matches(',').count() {
    b';'
  } else {
    b','
  }
}

fn read_csv(text: &str) -> Result<RawSheet> {
  let mut reader = csv::ReaderBuilder::new()
    .delimiter(sniff_delimiter(text))
    .flexible(true)
    .from_reader(text.as_bytes());

  let headers: Vec<String> = reader
    .headers()?
    .iter()
    .map(|h| h.trim().to_owned())
    .collect();
  if headers.iter().all(String::is_empty) {
    return Err(Error::EmptySheet);
  }

  let mut rows = Vec::new();
  for record in reader.records() {
    rows.push(record?.iter().map(Cell::from_text).collect());
  }

  Ok(RawSheet { headers, rows })
}

// ─── Mapping ─────────────────────────────────────────────────────────────────

struct RowView<'a> {
  cells: &'a [Cell],
  map:   &'a ColumnMap,
}

impl RowView<'_> {
  fn cell(&self, field: Field) -> &Cell {
    self
      .map
      .get(field)
      .and_then(|i| self.cells.get(i))
      .unwrap_or(&Cell::Empty)
  }

  fn text(&self, field: Field) -> Option<String> { self.cell(field).as_text() }

  fn product(&self) -> Product {
    Product {
      code:            self.text(Field::Code).unwrap_or_default(),
      name:            self.text(Field::Name).unwrap_or_default(),
      retail_price:    self.cell(Field::RetailPrice).as_number(),
      wholesale_price: self.cell(Field::WholesalePrice).as_number(),
      stock:           self.cell(Field::Stock).as_integer(),
      secondary_stock: self.cell(Field::SecondaryStock).as_integer(),
      description:     self.text(Field::Description),
      category:        self.text(Field::Category),
      image_url:       self.text(Field::ImageUrl),
      aisle:           self.text(Field::Aisle),
      shelf:           self.text(Field::Shelf),
      supplier:        self.text(Field::Supplier),
      created_at:      self.cell(Field::CreatedAt).as_datetime(),
    }
  }
}

pub(crate) fn build_table(raw: RawSheet, source: &str, bytes: &[u8]) -> Result<Table> {
  let map = ColumnMap::from_headers(&raw.headers);
  if let Some(field) = map.missing_required() {
    return Err(stockroom_core::Error::MissingColumn(field.into()).into());
  }

  let mut skipped = 0usize;
  let products: Vec<Product> = raw
    .rows
    .iter()
    .filter(|cells| {
      let blank = cells.iter().all(Cell::is_empty);
      skipped += usize::from(blank);
      !blank
    })
    .map(|cells| RowView { cells, map: &map }.product())
    .collect();

  let undated = products.iter().filter(|p| p.created_at.is_none()).count();
  tracing::debug!(
    source,
    rows = products.len(),
    skipped,
    undated,
    "decoded product sheet"
  );

  Ok(Table {
    columns: raw.headers,
    products,
    source: source.to_owned(),
    fingerprint: fingerprint(bytes),
    loaded_at: Utc::now(),
  })
}

pub(crate) fn fingerprint(bytes: &[u8]) -> String {
  hex::encode(Sha256::digest(bytes))
}
