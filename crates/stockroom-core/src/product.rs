//! Product — one row of the catalog spreadsheet.
//!
//! Every field other than `code` and `name` is optional: the source
//! spreadsheets vary from export to export, and a missing or empty cell is
//! represented as `None` rather than an empty string.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The logical columns a product row is built from.
///
/// The codec maps raw header text onto these. The snake_case string form is
/// always accepted as a header, alongside the Spanish spreadsheet names.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  AsRefStr,
  EnumIter,
  EnumString,
  IntoStaticStr,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Field {
  Code,
  Name,
  RetailPrice,
  WholesalePrice,
  Stock,
  SecondaryStock,
  Description,
  Category,
  ImageUrl,
  Aisle,
  Shelf,
  Supplier,
  CreatedAt,
}

impl Field {
  /// Columns without which a table cannot be loaded.
  pub const REQUIRED: [Field; 2] = [Field::Code, Field::Name];

  pub fn is_required(self) -> bool { Self::REQUIRED.contains(&self) }
}

// ─── Product ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub code:            String,
  pub name:            String,
  pub retail_price:    Option<f64>,
  pub wholesale_price: Option<f64>,
  pub stock:           Option<i64>,
  /// Units held at the secondary location (warehouse).
  pub secondary_stock: Option<i64>,
  pub description:     Option<String>,
  /// Raw comma-separated category list, as stored in the sheet.
  pub category:        Option<String>,
  pub image_url:       Option<String>,
  pub aisle:           Option<String>,
  pub shelf:           Option<String>,
  pub supplier:        Option<String>,
  pub created_at:      Option<NaiveDateTime>,
}

impl Product {
  /// Create a product with only its identifying fields set.
  pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      code: code.into(),
      name: name.into(),
      ..Self::default()
    }
  }

  /// The category tags of this product: the `category` field split on `,`,
  /// each token trimmed, empty tokens dropped.
  pub fn categories(&self) -> impl Iterator<Item = &str> {
    self
      .category
      .as_deref()
      .unwrap_or_default()
      .split(',')
      .map(str::trim)
      .filter(|t| !t.is_empty())
  }

  pub fn has_category(&self, category: &str) -> bool {
    self.categories().any(|c| c == category)
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn categories_are_split_and_trimmed() {
    let mut p = Product::new("A1", "Pelota");
    p.category = Some(" Juguetes ,Exterior,, Verano ".into());
    let tags: Vec<_> = p.categories().collect();
    assert_eq!(tags, ["Juguetes", "Exterior", "Verano"]);
    assert!(p.has_category("Exterior"));
    assert!(!p.has_category("exterior"));
  }

  #[test]
  fn missing_category_yields_no_tags() {
    let p = Product::new("A1", "Pelota");
    assert_eq!(p.categories().count(), 0);
    assert!(!p.has_category(""));
  }

  #[test]
  fn field_string_form_round_trips() {
    assert_eq!(Field::RetailPrice.to_string(), "retail_price");
    assert_eq!(Field::from_str("created_at").unwrap(), Field::CreatedAt);
    assert!(Field::Name.is_required());
    assert!(!Field::Stock.is_required());
  }
}
