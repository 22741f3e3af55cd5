//! File- and URL-backed catalog for Stockroom.
//!
//! Reads the product spreadsheet from a local path or an HTTP(S) URL, decodes
//! it on tokio's blocking pool, and caches the parsed table per source until
//! it is explicitly invalidated.

mod source;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use source::Source;
pub use store::FileCatalog;

#[cfg(test)]
mod tests;
