//! Catalog export automation.
//!
//! Opens the point-of-sale web app, drives its CSV export with scripted
//! keystrokes and clicks, then commits the downloaded file into the
//! repository the search server reads from.

pub mod config;
pub mod driver;
pub mod error;
pub mod runner;
pub mod step;

pub use config::ExportConfig;
pub use driver::{InputDriver, XdotoolDriver};
pub use error::{Error, Result};
pub use runner::Runner;
pub use step::{Step, plan};
