use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to start {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source:  io::Error,
  },
  #[error("{program} exited with {status}")]
  CommandFailed { program: String, status: ExitStatus },
  #[error("no files in download directory {0}")]
  NoDownloads(PathBuf),
  /// A file step ran before any file was picked.
  #[error("no downloaded file has been selected")]
  NoFileSelected,
  #[error("I/O error on {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("step {index} ({step}) failed: {source}")]
  Step {
    index:  usize,
    step:   String,
    #[source]
    source: Box<Error>,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
