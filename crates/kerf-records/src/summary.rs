use std::fs;
use std::path::{Path, PathBuf};

use kerf_core::domain::{BatchReport, RunStatistics};
use kerf_fs::{atomic_write_str, create_unique};
use serde::Serialize;
use tracing::info;

use crate::error::RecordsError;

/// Lo que se vuelca a `summary_<unix>.json` al final de cada ejecución.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
  pub finished_at: u64,
  #[serde(flatten)]
  pub stats: RunStatistics,
  pub elapsed_secs: f64,
  pub interrupted: bool,
  pub not_found_entries: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub not_found_report: Option<PathBuf>,
}

impl RunSummary {
  pub fn new(report: &BatchReport, finished_at: u64, not_found_report: Option<PathBuf>) -> Self {
    RunSummary {
      finished_at,
      stats: report.stats,
      elapsed_secs: report.elapsed.as_secs_f64(),
      interrupted: report.interrupted,
      not_found_entries: report.not_found.len(),
      not_found_report,
    }
  }
}

pub fn write_summary(dir: &Path, summary: &RunSummary) -> Result<PathBuf, RecordsError> {
  fs::create_dir_all(dir).map_err(|e| RecordsError::io(dir, e))?;

  let (path, _) = create_unique(dir, &format!("summary_{}", summary.finished_at), "json")
    .map_err(|e| RecordsError::io(dir, e))?;
  let json = serde_json::to_string_pretty(summary)?;
  atomic_write_str(&path, &json).map_err(|e| RecordsError::io(&path, e))?;

  info!(path = %path.display(), "run summary written");
  Ok(path)
}
