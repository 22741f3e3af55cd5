//! Product cards — the display payload rendered for one row.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{NO_DATA, product::Product};

// ─── Stock indicator ─────────────────────────────────────────────────────────

/// Severity bucket for a stock level.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Display,
  AsRefStr,
  EnumString,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StockColor {
  Green,
  Orange,
  Red,
}

/// Where the stock buckets split. Stock above `low` is green, stock in
/// `0..=low` is orange, negative stock is red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockThresholds {
  pub low: i64,
}

impl Default for StockThresholds {
  fn default() -> Self { Self { low: 5 } }
}

pub fn stock_color(stock: i64, thresholds: StockThresholds) -> StockColor {
  if stock < 0 {
    StockColor::Red
  } else if stock <= thresholds.low {
    StockColor::Orange
  } else {
    StockColor::Green
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockBadge {
  pub value: i64,
  pub color: StockColor,
}

// ─── Formatting ──────────────────────────────────────────────────────────────

/// Format a price as `$1,234,568`: rounded to whole units, comma thousands
/// separator. Missing or non-finite prices render as the no-data sentinel.
pub fn format_price(price: Option<f64>) -> String {
  match price.filter(|p| p.is_finite()) {
    Some(p) => {
      let rounded = p.round() as i64;
      let sign = if rounded < 0 { "-" } else { "" };
      format!("{sign}${}", group_thousands(rounded.unsigned_abs()))
    }
    None => NO_DATA.to_owned(),
  }
}

fn group_thousands(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(ch);
  }
  out
}

fn or_no_data(value: Option<&str>) -> String {
  value.unwrap_or(NO_DATA).to_owned()
}

// ─── Card ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum Image {
  Url(String),
  Unavailable,
}

/// Everything a front end needs to draw one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
  pub title:           String,
  pub code:            String,
  pub price:           String,
  pub wholesale_price: String,
  /// `None` when the row has no stock figure.
  pub stock:           Option<StockBadge>,
  pub secondary_stock: String,
  pub description:     String,
  pub categories:      Vec<String>,
  pub aisle:           String,
  pub shelf:           String,
  pub supplier:        String,
  pub image:           Image,
}

pub fn render(product: &Product, thresholds: StockThresholds) -> Card {
  Card {
    title:           product.name.clone(),
    code:            product.code.clone(),
    price:           format_price(product.retail_price),
    wholesale_price: format_price(product.wholesale_price),
    stock:           product.stock.map(|value| StockBadge {
      value,
      color: stock_color(value, thresholds),
    }),
    secondary_stock: product
      .secondary_stock
      .map(|s| s.to_string())
      .unwrap_or_else(|| NO_DATA.to_owned()),
    description:     or_no_data(product.description.as_deref()),
    categories:      product.categories().map(str::to_owned).collect(),
    aisle:           or_no_data(product.aisle.as_deref()),
    shelf:           or_no_data(product.shelf.as_deref()),
    supplier:        or_no_data(product.supplier.as_deref()),
    image:           match &product.image_url {
      Some(url) => Image::Url(url.clone()),
      None => Image::Unavailable,
    },
  }
}
