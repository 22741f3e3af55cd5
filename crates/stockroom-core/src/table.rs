//! The in-memory table a catalog is loaded into.
//!
//! A table is built once per load and never mutated afterwards; updates
//! replace the backing file and the whole table is re-read.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, product::Product};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
  /// Header row exactly as read from the source.
  pub columns:     Vec<String>,
  /// Rows in source order.
  pub products:    Vec<Product>,
  /// Human-readable description of where the table came from.
  pub source:      String,
  /// Hex SHA-256 of the raw bytes the table was decoded from.
  pub fingerprint: String,
  pub loaded_at:   DateTime<Utc>,
}

impl Table {
  pub fn len(&self) -> usize { self.products.len() }

  pub fn is_empty(&self) -> bool { self.products.is_empty() }

  /// One-line load report, e.g. `"1083 rows, 13 columns loaded"`.
  pub fn summary(&self) -> String {
    format!(
      "{} rows, {} columns loaded",
      self.products.len(),
      self.columns.len()
    )
  }

  /// Sorted, de-duplicated category tags across every row.
  pub fn categories(&self) -> Vec<String> {
    self
      .products
      .iter()
      .flat_map(Product::categories)
      .collect::<BTreeSet<_>>()
      .into_iter()
      .map(str::to_owned)
      .collect()
  }

  /// Look up a product by its code. Codes are compared after trimming.
  pub fn get(&self, code: &str) -> Option<&Product> {
    let code = code.trim();
    self.products.iter().find(|p| p.code == code)
  }

  pub fn require(&self, code: &str) -> Result<&Product> {
    self
      .get(code)
      .ok_or_else(|| Error::ProductNotFound(code.to_owned()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table(products: Vec<Product>) -> Table {
    Table {
      columns: vec!["Codigo".into(), "Nombre".into(), "Categorias".into()],
      products,
      source: "test".into(),
      fingerprint: String::new(),
      loaded_at: Utc::now(),
    }
  }

  fn with_category(code: &str, category: Option<&str>) -> Product {
    let mut p = Product::new(code, format!("Producto {code}"));
    p.category = category.map(str::to_owned);
    p
  }

  #[test]
  fn summary_reports_rows_and_columns() {
    let t = table(vec![Product::new("1", "a"), Product::new("2", "b")]);
    assert_eq!(t.summary(), "2 rows, 3 columns loaded");
  }

  #[test]
  fn categories_are_distinct_and_sorted() {
    let t = table(vec![
      with_category("1", Some("Peluches, Bebes")),
      with_category("2", Some("Bebes")),
      with_category("3", None),
      with_category("4", Some("  ")),
    ]);
    assert_eq!(t.categories(), ["Bebes", "Peluches"]);
  }

  #[test]
  fn require_unknown_code_is_not_found() {
    let t = table(vec![Product::new("1", "a")]);
    assert!(t.require(" 1 ").is_ok());
    assert!(matches!(t.require("9"), Err(Error::ProductNotFound(c)) if c == "9"));
  }
}
