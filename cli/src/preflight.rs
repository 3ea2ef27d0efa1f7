//! Comprobaciones previas al batch. Cualquier fallo aquí es de configuración:
//! el run no empieza y el proceso sale con código 2.

use std::fs;
use std::path::{Path, PathBuf};

use kerf_config::ConfigError;
use kerf_core::domain::NotFoundEntry;
use kerf_fs::{FsError, ensure_dir};
use kerf_locator::LocatorError;
use kerf_records::{CsvRecordSource, RecordsError, read_report};
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum PreflightError {
  #[error("config: {0}")]
  Config(#[from] ConfigError),

  #[error("locator: {0}")]
  Locator(#[from] LocatorError),

  #[error("source root is not an accessible directory: {}", .0.display())]
  Root(PathBuf),

  #[error("no csv directory configured (set [records].csv_dir or pass --csv-dir)")]
  NoCsvDir,

  #[error("csv directory: {0}")]
  CsvDir(#[source] RecordsError),

  #[error("no destination configured (set [output].destination or pass --dest)")]
  NoDestination,

  #[error("cannot create destination {}: {source}", path.display())]
  Destination {
    path: PathBuf,
    #[source]
    source: FsError,
  },

  #[error("no recovery root configured (set [recovery].roots or pass --root)")]
  NoRecoveryRoot,

  #[error("not-found report: {0}")]
  Report(#[source] RecordsError),
}

pub struct RunPlan {
  pub source: CsvRecordSource,
  pub destination: PathBuf,
}

pub struct RecoverPlan {
  pub root: PathBuf,
  pub target_extension: String,
  pub entries: Vec<NotFoundEntry>,
  pub destination: PathBuf,
}

pub fn check_run(cfg: &AppConfig) -> Result<RunPlan, PreflightError> {
  cfg.locator.validate()?;
  for root in &cfg.locator.roots {
    check_root(root)?;
  }

  let csv_dir = cfg.records.csv_dir.as_deref().ok_or(PreflightError::NoCsvDir)?;
  let source =
    CsvRecordSource::from_dir(csv_dir, cfg.records.material_prefix.as_str()).map_err(PreflightError::CsvDir)?;
  debug!(dir = %csv_dir.display(), "{} csv file(s) found", source.files().len());

  let destination = check_destination(cfg)?;
  Ok(RunPlan { source, destination })
}

pub fn check_recover(cfg: &AppConfig, report: &Path) -> Result<RecoverPlan, PreflightError> {
  if cfg.locator.max_dirs_per_root == 0 {
    return Err(LocatorError::ZeroVisitCap.into());
  }

  let target_extension = cfg.recovery.target_extension()?;

  // Sólo se usa la primera raíz de recuperación.
  let root = cfg.recovery.roots.first().ok_or(PreflightError::NoRecoveryRoot)?;
  check_root(root)?;

  let entries = read_report(report).map_err(PreflightError::Report)?;
  let destination = check_destination(cfg)?;

  Ok(RecoverPlan { root: root.clone(), target_extension, entries, destination })
}

fn check_root(root: &Path) -> Result<(), PreflightError> {
  match fs::read_dir(root) {
    Ok(_) => Ok(()),
    Err(e) => {
      debug!(root = %root.display(), "root check failed: {e}");
      Err(PreflightError::Root(root.to_path_buf()))
    }
  }
}

fn check_destination(cfg: &AppConfig) -> Result<PathBuf, PreflightError> {
  let dest = cfg.output.destination.clone().ok_or(PreflightError::NoDestination)?;
  ensure_dir(&dest).map_err(|source| PreflightError::Destination { path: dest.clone(), source })?;
  Ok(dest)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  fn config(root: &Path, csv: &Path, dest: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.locator.roots = vec![root.to_path_buf()];
    cfg.records.csv_dir = Some(csv.to_path_buf());
    cfg.output.destination = Some(dest.to_path_buf());
    cfg
  }

  #[test]
  fn accepts_a_complete_setup_and_creates_destination() {
    let tmp = tempdir().unwrap();
    let dest = tmp.path().join("out/nested");

    let plan = check_run(&config(tmp.path(), tmp.path(), &dest)).unwrap();

    assert!(dest.is_dir());
    assert_eq!(plan.destination, dest);
  }

  #[test]
  fn missing_root_is_fatal() {
    let tmp = tempdir().unwrap();
    let cfg = config(&tmp.path().join("gone"), tmp.path(), tmp.path());

    assert!(matches!(check_run(&cfg), Err(PreflightError::Root(_))));
  }

  #[test]
  fn missing_csv_dir_and_destination_are_fatal() {
    let tmp = tempdir().unwrap();
    let mut cfg = config(tmp.path(), &tmp.path().join("no-csv"), tmp.path());
    assert!(matches!(check_run(&cfg), Err(PreflightError::CsvDir(_))));

    cfg.records.csv_dir = None;
    assert!(matches!(check_run(&cfg), Err(PreflightError::NoCsvDir)));

    cfg.records.csv_dir = Some(tmp.path().to_path_buf());
    cfg.output.destination = None;
    assert!(matches!(check_run(&cfg), Err(PreflightError::NoDestination)));
  }

  #[test]
  fn destination_blocked_by_a_file_is_fatal() {
    let tmp = tempdir().unwrap();
    let blocker = tmp.path().join("out");
    fs::write(&blocker, b"").unwrap();

    let cfg = config(tmp.path(), tmp.path(), &blocker);
    assert!(matches!(check_run(&cfg), Err(PreflightError::Destination { .. })));
  }

  #[test]
  fn recovery_needs_root_and_readable_report() {
    let tmp = tempdir().unwrap();
    let mut cfg = config(tmp.path(), tmp.path(), &tmp.path().join("out"));
    let report = tmp.path().join("not_found_1.txt");

    assert!(matches!(check_recover(&cfg, &report), Err(PreflightError::NoRecoveryRoot)));

    cfg.recovery.roots = vec![tmp.path().to_path_buf()];
    assert!(matches!(check_recover(&cfg, &report), Err(PreflightError::Report(_))));

    fs::write(&report, "Product Name: A\nMaterial: Steel\nThickness: 2\nQuantity: 1\n").unwrap();
    let plan = check_recover(&cfg, &report).unwrap();
    assert_eq!(plan.entries.len(), 1);
    assert_eq!(plan.target_extension, "dxf");
  }

  #[test]
  fn empty_recovery_extension_is_fatal() {
    let tmp = tempdir().unwrap();
    let mut cfg = config(tmp.path(), tmp.path(), &tmp.path().join("out"));
    cfg.recovery.roots = vec![tmp.path().to_path_buf()];
    cfg.recovery.target_extension = ".".into();

    let err = check_recover(&cfg, &tmp.path().join("not_found_1.txt")).err();
    assert!(matches!(err, Some(PreflightError::Locator(LocatorError::NoTargetExtension))));
  }
}
