//! Core types and trait definitions for the Stockroom product catalog.
//!
//! This crate is deliberately free of HTTP, file-format and I/O dependencies.
//! All other crates depend on it.

pub mod card;
pub mod catalog;
pub mod error;
pub mod paths;
pub mod product;
pub mod query;
pub mod table;

pub use error::{Error, Result};

/// Display value substituted for any missing field.
pub const NO_DATA: &str = "Sin datos";
