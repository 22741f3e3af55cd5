//! Export configuration.
//!
//! Every constant of the export run lives here. The defaults reproduce the
//! store's original export procedure; a TOML file overrides any subset.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use stockroom_core::paths::expand_tilde;

/// One scripted input action. In TOML:
///
/// ```toml
/// script = [
///   { key = "tab" },
///   { wait = 500 },
///   { repeat = { key = "tab", times = 29, wait = 100 } },
///   { click = { x = 2960, y = 380 } },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
  Key(String),
  /// Milliseconds.
  Wait(u64),
  Click { x: i32, y: i32 },
  Repeat { key: String, times: u32, wait: u64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
  pub browser_command:  String,
  pub browser_args:     Vec<String>,
  /// Passed to the browser as `--app-url=...`.
  pub app_url:          String,
  /// Milliseconds to let the app window open.
  pub launch_wait:      u64,
  pub script:           Vec<Action>,
  pub download_dir:     PathBuf,
  /// Name the newest download is renamed to.
  pub file_name:        String,
  pub repo_path:        PathBuf,
  /// `{file}` is replaced with `file_name`.
  pub commit_message:   String,
  pub remote:           String,
  pub branch:           String,
}

fn key(k: &str) -> Action { Action::Key(k.to_owned()) }

impl Default for ExportConfig {
  fn default() -> Self {
    Self {
      browser_command: "microsoft-edge".to_string(),
      browser_args:    vec![
        "--profile-directory=Default".to_string(),
        "--app-id=aaiihkibclfhphlgcllldaaphlhflgoc".to_string(),
        "--app-run-on-os-login-mode=windowed".to_string(),
        "--app-launch-source=19".to_string(),
      ],
      app_url:         "https://smartycart.com.ar/".to_string(),
      launch_wait:     5_000,
      script:          vec![
        key("tab"),
        Action::Wait(500),
        key("tab"),
        Action::Wait(500),
        key("down"),
        Action::Wait(500),
        key("enter"),
        Action::Wait(1_000),
        Action::Repeat {
          key:   "tab".to_string(),
          times: 29,
          wait:  100,
        },
        key("space"),
        Action::Wait(1_000),
        Action::Click { x: 2960, y: 380 },
        Action::Wait(1_000),
        Action::Click { x: 3115, y: 308 },
        Action::Wait(10_000),
      ],
      download_dir:    PathBuf::from("~/Downloads"),
      file_name:       "tmp_28_1728896035.csv".to_string(),
      repo_path:       PathBuf::from("~/Repositorios/Soop"),
      commit_message:  "Subida de {file}".to_string(),
      remote:          "origin".to_string(),
      branch:          "main".to_string(),
    }
  }
}

impl ExportConfig {
  pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
    let mut cfg: Self = toml::from_str(raw)?;
    cfg.download_dir = expand_tilde(&cfg.download_dir);
    cfg.repo_path = expand_tilde(&cfg.repo_path);
    Ok(cfg)
  }

  /// Defaults with `~` resolved.
  pub fn resolved_default() -> Self {
    let mut cfg = Self::default();
    cfg.download_dir = expand_tilde(&cfg.download_dir);
    cfg.repo_path = expand_tilde(&cfg.repo_path);
    cfg
  }

  pub fn commit_message(&self) -> String {
    self.commit_message.replace("{file}", &self.file_name)
  }
}
