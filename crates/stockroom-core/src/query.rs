//! Filtering, sorting and pagination over a [`Table`].
//!
//! Every operation borrows rows from the table; nothing here copies a
//! product until the caller decides to.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{product::Product, table::Table};

impl<'a> IntoIterator for &'a Table {
  type Item = &'a Product;
  type IntoIter = std::slice::Iter<'a, Product>;

  fn into_iter(self) -> Self::IntoIter { self.products.iter() }
}

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Default length of the "most recent products" view.
pub const DEFAULT_RECENT: usize = 100;

// ─── Query type ──────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sort {
  /// Source order.
  #[default]
  None,
  /// Newest `created_at` first; undated rows last.
  Recent,
}

/// Parameters for [`run`]. All filters are combined with AND.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductQuery {
  /// Case-insensitive substring of the product name.
  pub text:      Option<String>,
  /// Exact category tag.
  pub category:  Option<String>,
  /// Case-insensitive prefix of the product name.
  pub prefix:    Option<String>,
  #[serde(default)]
  pub sort:      Sort,
  /// 1-based page number.
  pub page:      usize,
  pub page_size: usize,
}

impl Default for ProductQuery {
  fn default() -> Self {
    Self {
      text:      None,
      category:  None,
      prefix:    None,
      sort:      Sort::None,
      page:      1,
      page_size: DEFAULT_PAGE_SIZE,
    }
  }
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// Rows whose name contains `query`, ignoring case. A blank query matches
/// every row; any other query is matched as given, spaces included.
pub fn search<'a, I>(rows: I, query: &str) -> Vec<&'a Product>
where
  I: IntoIterator<Item = &'a Product>,
{
  if query.trim().is_empty() {
    return rows.into_iter().collect();
  }
  let needle = query.to_lowercase();
  rows
    .into_iter()
    .filter(|p| p.name.to_lowercase().contains(&needle))
    .collect()
}

/// Rows tagged with exactly `category`. Rows without a category never match.
pub fn filter_by_category<'a, I>(rows: I, category: &str) -> Vec<&'a Product>
where
  I: IntoIterator<Item = &'a Product>,
{
  let category = category.trim();
  rows
    .into_iter()
    .filter(|p| p.has_category(category))
    .collect()
}

/// Rows whose name starts with `prefix`, ignoring case. A blank prefix
/// matches every row.
pub fn filter_by_prefix<'a, I>(rows: I, prefix: &str) -> Vec<&'a Product>
where
  I: IntoIterator<Item = &'a Product>,
{
  let prefix = prefix.trim().to_lowercase();
  rows
    .into_iter()
    .filter(|p| p.name.trim_start().to_lowercase().starts_with(&prefix))
    .collect()
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// Sort rows newest first by `created_at`.
///
/// The sort is stable. Rows without a timestamp are kept and placed after
/// every dated row, in their original relative order.
pub fn sort_by_date(rows: &mut [&Product]) {
  rows.sort_by(|a, b| match (a.created_at, b.created_at) {
    (Some(x), Some(y)) => y.cmp(&x),
    (Some(_), None) => std::cmp::Ordering::Less,
    (None, Some(_)) => std::cmp::Ordering::Greater,
    (None, None) => std::cmp::Ordering::Equal,
  });
}

/// The `n` most recently created products.
pub fn recent(table: &Table, n: usize) -> Vec<&Product> {
  let mut rows: Vec<&Product> = table.products.iter().collect();
  sort_by_date(&mut rows);
  rows.truncate(n);
  rows
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
  pub items:       Vec<T>,
  /// 1-based page number that was requested.
  pub page:        usize,
  pub page_size:   usize,
  /// Number of rows across all pages.
  pub total:       usize,
  pub total_pages: usize,
}

impl<T> Page<T> {
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items:       self.items.into_iter().map(f).collect(),
      page:        self.page,
      page_size:   self.page_size,
      total:       self.total,
      total_pages: self.total_pages,
    }
  }

  pub fn has_next(&self) -> bool { self.page < self.total_pages }

  pub fn has_prev(&self) -> bool { self.page > 1 && self.total_pages > 0 }
}

/// Slice `rows` into page `page` (1-based) of `page_size` rows.
///
/// Page 0, a zero page size, and pages past the end produce an empty page
/// rather than an error.
pub fn paginate<T: Clone>(rows: &[T], page: usize, page_size: usize) -> Page<T> {
  let total = rows.len();
  let total_pages = if page_size == 0 { 0 } else { total.div_ceil(page_size) };

  let items = if page == 0 || page_size == 0 {
    Vec::new()
  } else {
    let start = (page - 1).saturating_mul(page_size);
    rows
      .iter()
      .skip(start)
      .take(page_size)
      .cloned()
      .collect()
  };

  Page {
    items,
    page,
    page_size,
    total,
    total_pages,
  }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Apply every filter in `query`, then its sort, then paginate.
pub fn run<'a>(table: &'a Table, query: &ProductQuery) -> Page<&'a Product> {
  let mut rows: Vec<&Product> = match query.text.as_deref() {
    Some(text) => search(table, text),
    None => table.products.iter().collect(),
  };
  if let Some(category) = query.category.as_deref().filter(|c| !c.trim().is_empty()) {
    rows = filter_by_category(rows, category);
  }
  if let Some(prefix) = query.prefix.as_deref() {
    rows = filter_by_prefix(rows, prefix);
  }
  if query.sort == Sort::Recent {
    sort_by_date(&mut rows);
  }
  paginate(&rows, query.page, query.page_size)
}
