//! The export plan: configuration expanded into an ordered list of steps.

use std::{fmt, path::PathBuf, time::Duration};

use crate::config::{Action, ExportConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
  Launch { command: String, args: Vec<String> },
  Pause(Duration),
  Key(String),
  Click { x: i32, y: i32 },
  /// Select the most recently created file in `dir`.
  PickNewest { dir: PathBuf },
  /// Rename the selected file within its directory.
  Rename { to: String },
  /// Move the selected file into `dir`, keeping its name.
  MoveInto { dir: PathBuf },
  Git { repo: PathBuf, args: Vec<String> },
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Step::Launch { command, args } => write!(f, "launch {command} {}", args.join(" ")),
      Step::Pause(d) => write!(f, "wait {} ms", d.as_millis()),
      Step::Key(k) => write!(f, "press {k}"),
      Step::Click { x, y } => write!(f, "click at ({x}, {y})"),
      Step::PickNewest { dir } => write!(f, "pick newest file in {}", dir.display()),
      Step::Rename { to } => write!(f, "rename to {to}"),
      Step::MoveInto { dir } => write!(f, "move into {}", dir.display()),
      Step::Git { repo, args } => write!(f, "git -C {} {}", repo.display(), args.join(" ")),
    }
  }
}

fn millis(ms: u64) -> Step { Step::Pause(Duration::from_millis(ms)) }

/// Expand `cfg` into the full step list.
pub fn plan(cfg: &ExportConfig) -> Vec<Step> {
  let mut args = cfg.browser_args.clone();
  args.push(format!("--app-url={}", cfg.app_url));

  let mut steps = vec![
    Step::Launch {
      command: cfg.browser_command.clone(),
      args,
    },
    millis(cfg.launch_wait),
  ];

  for action in &cfg.script {
    match action {
      Action::Key(k) => steps.push(Step::Key(k.clone())),
      Action::Wait(ms) => steps.push(millis(*ms)),
      Action::Click { x, y } => steps.push(Step::Click { x: *x, y: *y }),
      Action::Repeat { key, times, wait } => {
        for _ in 0..*times {
          steps.push(Step::Key(key.clone()));
          steps.push(millis(*wait));
        }
      }
    }
  }

  let git = |args: &[&str]| Step::Git {
    repo: cfg.repo_path.clone(),
    args: args.iter().map(|a| (*a).to_owned()).collect(),
  };
  let message = cfg.commit_message();

  steps.extend([
    Step::PickNewest {
      dir: cfg.download_dir.clone(),
    },
    Step::Rename {
      to: cfg.file_name.clone(),
    },
    Step::MoveInto {
      dir: cfg.repo_path.clone(),
    },
    git(&["add", "."]),
    git(&["commit", "-m", &message]),
    git(&["push", &cfg.remote, &cfg.branch]),
  ]);
  steps
}
