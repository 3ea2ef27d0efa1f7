use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordsError {
  #[error("cannot read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("not a directory: {0}")]
  NotADirectory(PathBuf),

  #[error("malformed csv in {path}: {source}")]
  Csv {
    path: PathBuf,
    #[source]
    source: csv::Error,
  },

  #[error("{path}: no product name column in header")]
  MissingIdentifierColumn { path: PathBuf },

  #[error("report pattern: {0}")]
  Pattern(#[from] regex::Error),

  #[error("json encode: {0}")]
  Json(#[from] serde_json::Error),
}

impl RecordsError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    RecordsError::Io { path: path.into(), source }
  }
}
