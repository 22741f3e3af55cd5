//! The `Catalog` trait.
//!
//! The trait is implemented by backends (e.g. `stockroom-store-file`).
//! Higher layers (`stockroom-api`, `stockroom-web`) depend on this
//! abstraction, not on any concrete backend.

use std::{future::Future, sync::Arc};

use crate::table::Table;

/// Abstraction over a source of product tables.
///
/// A catalog hands out shared, immutable [`Table`]s. Tables are never
/// modified in place: [`Catalog::replace`] swaps the backing data and the
/// next [`Catalog::table`] call observes the new table.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait Catalog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The current table, loading it if nothing is cached.
  fn table(&self) -> impl Future<Output = Result<Arc<Table>, Self::Error>> + Send + '_;

  /// Drop any cached table so the next [`Catalog::table`] call re-reads the
  /// source.
  fn invalidate(&self);

  /// Overwrite the backing data with `bytes` (a spreadsheet or CSV file),
  /// invalidate the cache, and return the freshly loaded table.
  fn replace(
    &self,
    bytes: Vec<u8>,
  ) -> impl Future<Output = Result<Arc<Table>, Self::Error>> + Send + '_;

  /// Whether `error` from [`Catalog::replace`] means the upload itself was
  /// unacceptable (undecodable data, wrong columns, read-only source) as
  /// opposed to the backend failing to store it.
  fn is_rejection(error: &Self::Error) -> bool;
}
