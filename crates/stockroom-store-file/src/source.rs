//! Where a catalog spreadsheet is read from.

use std::{fmt, path::PathBuf};

/// A local file or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
  Path(PathBuf),
  Url(String),
}

impl Source {
  /// Anything starting with `http://` or `https://` is a URL; everything
  /// else is a path.
  pub fn parse(raw: &str) -> Self {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
      Source::Url(trimmed.to_owned())
    } else {
      Source::Path(PathBuf::from(trimmed))
    }
  }

  /// Cache key for this source.
  pub fn key(&self) -> String { self.to_string() }
}

impl fmt::Display for Source {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Source::Path(p) => write!(f, "{}", p.display()),
      Source::Url(u) => f.write_str(u),
    }
  }
}

impl From<PathBuf> for Source {
  fn from(path: PathBuf) -> Self { Source::Path(path) }
}
