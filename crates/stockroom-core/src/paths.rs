//! Path helpers shared by the binaries.

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the user's home directory. Paths without one, or
/// when no home directory is known, are returned unchanged.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let Ok(rest) = path.strip_prefix("~") else {
    return path.to_path_buf();
  };
  match dirs::home_dir() {
    Some(home) => home.join(rest),
    None => path.to_path_buf(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn absolute_paths_are_untouched() {
    assert_eq!(expand_tilde(Path::new("/srv/repo")), PathBuf::from("/srv/repo"));
  }

  #[test]
  fn tilde_names_are_not_home() {
    assert_eq!(expand_tilde(Path::new("~juan/x")), PathBuf::from("~juan/x"));
  }

  #[test]
  fn leading_tilde_is_home() {
    if let Some(home) = dirs::home_dir() {
      assert_eq!(expand_tilde(Path::new("~/Downloads")), home.join("Downloads"));
      assert_eq!(expand_tilde(Path::new("~")), home);
    }
  }
}
