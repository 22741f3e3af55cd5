//! Executing a plan.

use std::{
  fs,
  path::{Path, PathBuf},
  process::Command,
  time::SystemTime,
};

use crate::{
  driver::InputDriver,
  error::{Error, Result},
  step::Step,
};

/// Runs steps in order, stopping at the first failure.
pub struct Runner<D> {
  driver:   D,
  /// The downloaded file as it moves through pick, rename and move.
  selected: Option<PathBuf>,
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
  move |source| Error::Io {
    path: path.to_path_buf(),
    source,
  }
}

/// The file in `dir` with the latest creation time (modification time where
/// the filesystem does not record creation).
pub fn newest_file(dir: &Path) -> Result<PathBuf> {
  let mut newest: Option<(SystemTime, PathBuf)> = None;
  for entry in fs::read_dir(dir).map_err(io_err(dir))? {
    let entry = entry.map_err(io_err(dir))?;
    let meta = entry.metadata().map_err(io_err(&entry.path()))?;
    if !meta.is_file() {
      continue;
    }
    let stamp = meta
      .created()
      .or_else(|_| meta.modified())
      .unwrap_or(SystemTime::UNIX_EPOCH);
    if newest.as_ref().is_none_or(|(best, _)| stamp > *best) {
      newest = Some((stamp, entry.path()));
    }
  }
  newest
    .map(|(_, path)| path)
    .ok_or_else(|| Error::NoDownloads(dir.to_path_buf()))
}

/// Rename, falling back to copy-and-delete across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<()> {
  if fs::rename(from, to).is_ok() {
    return Ok(());
  }
  fs::copy(from, to).map_err(io_err(to))?;
  fs::remove_file(from).map_err(io_err(from))
}

fn git(repo: &Path, args: &[String]) -> Result<()> {
  let status = Command::new("git")
    .arg("-C")
    .arg(repo)
    .args(args)
    .status()
    .map_err(|source| Error::Spawn {
      program: "git".to_string(),
      source,
    })?;
  if !status.success() {
    return Err(Error::CommandFailed {
      program: format!("git {}", args.first().map(String::as_str).unwrap_or_default()),
      status,
    });
  }
  Ok(())
}

impl<D: InputDriver> Runner<D> {
  pub fn new(driver: D) -> Self {
    Self {
      driver,
      selected: None,
    }
  }

  pub fn driver(&self) -> &D { &self.driver }

  /// Where the downloaded file currently is, once one has been picked.
  pub fn selected(&self) -> Option<&Path> { self.selected.as_deref() }

  fn selected_or_err(&self) -> Result<PathBuf> {
    self.selected.clone().ok_or(Error::NoFileSelected)
  }

  fn execute(&mut self, step: &Step) -> Result<()> {
    match step {
      Step::Launch { command, args } => self.driver.launch(command, args),
      Step::Pause(d) => {
        self.driver.pause(*d);
        Ok(())
      }
      Step::Key(k) => self.driver.key(k),
      Step::Click { x, y } => self.driver.click(*x, *y),
      Step::PickNewest { dir } => {
        let path = newest_file(dir)?;
        tracing::info!(path = %path.display(), "newest download");
        self.selected = Some(path);
        Ok(())
      }
      Step::Rename { to } => {
        let from = self.selected_or_err()?;
        let target = from.with_file_name(to);
        move_file(&from, &target)?;
        tracing::info!(path = %target.display(), "renamed");
        self.selected = Some(target);
        Ok(())
      }
      Step::MoveInto { dir } => {
        let from = self.selected_or_err()?;
        let name = from.file_name().ok_or(Error::NoFileSelected)?;
        let target = dir.join(name);
        move_file(&from, &target)?;
        self.selected = Some(target);
        Ok(())
      }
      Step::Git { repo, args } => git(repo, args),
    }
  }

  /// Run `steps` in order. The first failing step aborts the run and is
  /// reported with its position.
  pub fn run(&mut self, steps: &[Step]) -> Result<()> {
    for (index, step) in steps.iter().enumerate() {
      tracing::debug!(index, %step, "step");
      self.execute(step).map_err(|source| Error::Step {
        index,
        step: step.to_string(),
        source: Box::new(source),
      })?;
    }
    Ok(())
  }
}
