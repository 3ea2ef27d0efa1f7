pub mod cli;
pub mod config;
pub mod infrastructure;
pub mod logging;
pub mod preflight;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use kerf_config::{KerfPaths, TomlConfigBackend};
use kerf_core::domain::{BatchReport, NotFoundEntry, Record};
use kerf_core::services::BatchService;
use kerf_fs::FsReplicator;
use kerf_locator::FsFileLocator;
use kerf_records::{RunSummary, write_report, write_summary};
use tracing::{info, warn};

use crate::cli::{Cli, Command, ConfigAction};
use crate::config::AppConfig;
use crate::preflight::PreflightError;
use infrastructure::reporter::TracingReporter;

/// Lo que deja en disco una ejecución, además de los archivos copiados.
#[derive(Debug)]
pub struct RunOutput {
  pub report: BatchReport,
  pub not_found_report: Option<PathBuf>,
  pub summary: PathBuf,
}

/// Pasada principal: CSV → locator estándar → réplica.
pub fn provision(cfg: &AppConfig, reports_dir: &Path, stop: &AtomicBool) -> Result<RunOutput> {
  let plan = preflight::check_run(cfg)?;
  let load = plan.source.load();

  info!(
    roots = cfg.locator.roots.len(),
    records = load.records.len(),
    destination = %plan.destination.display(),
    "starting run"
  );

  // --- Dependency Injection ---
  let locator = FsFileLocator::standard(&cfg.locator);
  let replicator = FsReplicator::new(cfg.replica.clone());
  let service = BatchService::new(locator, replicator, TracingReporter, plan.destination);

  let mut report = service.run(load.records, Some(stop));

  if load.failed_files > 0 {
    warn!("{} csv file(s) could not be read", load.failed_files);
    report.stats.record_errors(load.failed_files);
  }

  write_outputs(report, reports_dir)
}

/// Pasada de recuperación: relee un informe de no encontrados y busca sólo el
/// tipo objetivo junto a cualquier archivo hermano del producto.
pub fn recover(cfg: &AppConfig, report_file: &Path, reports_dir: &Path, stop: &AtomicBool) -> Result<RunOutput> {
  let plan = preflight::check_recover(cfg, report_file)?;
  let records: Vec<Record> = plan.entries.iter().map(NotFoundEntry::to_record).collect();

  info!(
    root = %plan.root.display(),
    records = records.len(),
    target = %plan.target_extension,
    "starting recovery"
  );

  let locator = FsFileLocator::by_proxy(vec![plan.root], &plan.target_extension, cfg.locator.walk_limits())
    .map_err(PreflightError::from)?;
  let replicator = FsReplicator::new(cfg.replica.clone());
  let service = BatchService::new(locator, replicator, TracingReporter, plan.destination);

  let report = service.run(records, Some(stop));
  write_outputs(report, reports_dir)
}

fn write_outputs(report: BatchReport, reports_dir: &Path) -> Result<RunOutput> {
  let finished_at = unix_now();

  let not_found_report = if report.not_found.is_empty() {
    None
  } else {
    Some(write_report(reports_dir, &report.not_found, finished_at).context("Failed to write not-found report")?)
  };

  let summary = RunSummary::new(&report, finished_at, not_found_report.clone());
  let summary_path = write_summary(reports_dir, &summary).context("Failed to write run summary")?;

  Ok(RunOutput { report, not_found_report, summary: summary_path })
}

fn unix_now() -> u64 {
  SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// 2 para errores de configuración, 1 para el resto.
pub fn exit_code(err: &anyhow::Error) -> u8 {
  if err.chain().any(|cause| cause.is::<PreflightError>()) { 2 } else { 1 }
}

pub async fn run(cli: Cli) -> Result<()> {
  let mut paths = KerfPaths::new().map_err(PreflightError::from).context("Failed to prepare kerf directories")?;
  if let Some(file) = &cli.config {
    paths = paths.with_config_file(file);
  }

  let backend = TomlConfigBackend::new(&paths);
  let mut cfg = AppConfig::load(&backend)
    .map_err(PreflightError::from)
    .with_context(|| format!("Failed to load {}", backend.path().display()))?;

  match cli.command {
    Command::Config { action } => config_command(action, &cfg, &backend),
    Command::Run(args) => {
      cfg.apply_run_args(&args);
      let log = logging::init_logging(&paths.logs_dir, cli.verbose, unix_now())?;
      info!("logging to {}", log.display());

      let reports_dir = paths.reports_dir.clone();
      let output = run_interruptible(move |stop| provision(&cfg, &reports_dir, stop)).await?;
      announce(&output);
      Ok(())
    }
    Command::Recover(args) => {
      cfg.apply_recover_args(&args);
      let log = logging::init_logging(&paths.logs_dir, cli.verbose, unix_now())?;
      info!("logging to {}", log.display());

      let reports_dir = paths.reports_dir.clone();
      let report_file = args.report;
      let output = run_interruptible(move |stop| recover(&cfg, &report_file, &reports_dir, stop)).await?;
      announce(&output);
      Ok(())
    }
  }
}

fn config_command(action: ConfigAction, cfg: &AppConfig, backend: &TomlConfigBackend) -> Result<()> {
  match action {
    ConfigAction::Init => {
      cfg.save(backend).map_err(PreflightError::from).context("Failed to write config file")?;
      println!("{}", backend.path().display());
    }
    ConfigAction::Show => {
      let text = toml::to_string_pretty(cfg).context("Failed to render configuration")?;
      print!("{text}");
    }
    ConfigAction::Path => println!("{}", backend.path().display()),
  }
  Ok(())
}

/// El batch es síncrono: corre en un hilo bloqueante mientras la tarea async
/// escucha Ctrl-C y levanta la bandera de parada.
async fn run_interruptible<F>(job: F) -> Result<RunOutput>
where
  F: FnOnce(&AtomicBool) -> Result<RunOutput> + Send + 'static,
{
  let stop = Arc::new(AtomicBool::new(false));

  let flag = Arc::clone(&stop);
  let watcher = tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      warn!("interrupt received, finishing the current record");
      flag.store(true, Ordering::Relaxed);
    }
  });

  let result = tokio::task::spawn_blocking(move || job(&stop)).await.context("batch worker panicked")?;
  watcher.abort();
  result
}

fn announce(output: &RunOutput) {
  let s = &output.report.stats;
  info!(
    processed = s.processed(),
    copied = s.copied(),
    not_found = s.not_found(),
    errors = s.errors(),
    skipped = s.skipped(),
    "summary written to {}",
    output.summary.display()
  );
  if let Some(path) = &output.not_found_report {
    info!("not-found report: {}", path.display());
  }
  if output.report.interrupted {
    warn!("run was interrupted before all records were processed");
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::{TempDir, tempdir};

  struct Workshop {
    _tmp: TempDir,
    cad: PathBuf,
    csv: PathBuf,
    out: PathBuf,
    reports: PathBuf,
  }

  fn workshop(csv_body: &str) -> Workshop {
    let tmp = tempdir().unwrap();
    let cad = tmp.path().join("cad");
    let csv = tmp.path().join("lists");
    fs::create_dir_all(&cad).unwrap();
    fs::create_dir_all(&csv).unwrap();
    fs::write(csv.join("Copy of THICKNESS AND MATERIAL DATA - Steel.csv"), csv_body).unwrap();

    Workshop { cad, csv, out: tmp.path().join("out"), reports: tmp.path().join("reports"), _tmp: tmp }
  }

  fn config(w: &Workshop) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.locator.roots = vec![w.cad.clone()];
    cfg.records.csv_dir = Some(w.csv.clone());
    cfg.output.destination = Some(w.out.clone());
    cfg
  }

  #[test]
  fn places_numbered_copies_per_material_and_thickness() {
    let w = workshop("Product Name,Thickness (mm),Quantity\nPART-001,2mm,3\n");
    fs::write(w.cad.join("PART-001.dxf"), b"0\nEOF\n").unwrap();

    let out = provision(&config(&w), &w.reports, &AtomicBool::new(false)).unwrap();

    let dir = w.out.join("Steel").join("2");
    for i in 1..=3 {
      assert_eq!(fs::read(dir.join(format!("{i}_PART-001.dxf"))).unwrap(), b"0\nEOF\n");
    }
    assert_eq!(out.report.stats.copied(), 3);
    assert_eq!(out.report.stats.processed(), 1);
    assert!(out.not_found_report.is_none());
    assert!(out.summary.is_file());
  }

  #[test]
  fn zero_quantity_only_counts_as_skipped() {
    let w = workshop("Product Name,Thickness,Quantity\nPART-001,2,0\n");
    fs::write(w.cad.join("PART-001.dxf"), b"x").unwrap();

    let out = provision(&config(&w), &w.reports, &AtomicBool::new(false)).unwrap();

    assert_eq!(out.report.stats.skipped(), 1);
    assert_eq!(out.report.stats.processed(), 0);
    assert!(fs::read_dir(&w.out).unwrap().next().is_none());
  }

  #[test]
  fn missing_part_lands_in_report_and_recovery_finds_it() {
    let w = workshop("Product Name,Thickness,Quantity\nPART-404,1.5,2\n");

    let out = provision(&config(&w), &w.reports, &AtomicBool::new(false)).unwrap();
    assert_eq!(out.report.stats.not_found(), 1);
    assert!(fs::read_dir(&w.out).unwrap().next().is_none());

    let report = out.not_found_report.unwrap();
    assert!(fs::read_to_string(&report).unwrap().contains("Product Name: PART-404"));

    // El DXF vive junto al PDF en un archivo de proyectos aparte.
    let archive = w.cad.parent().unwrap().join("archive");
    fs::create_dir_all(archive.join("2019/job-17")).unwrap();
    fs::write(archive.join("2019/job-17/PART-404.pdf"), b"pdf").unwrap();
    fs::write(archive.join("2019/job-17/PART-404 flat.DXF"), b"dxf").unwrap();

    let mut cfg = config(&w);
    cfg.recovery.roots = vec![archive];
    let again = recover(&cfg, &report, &w.reports, &AtomicBool::new(false)).unwrap();

    assert_eq!(again.report.stats.copied(), 2);
    assert!(w.out.join("Steel/1.5/2_PART-404 flat.DXF").is_file());
  }

  #[test]
  fn recovery_that_still_misses_keeps_its_input_report() {
    let w = workshop("Product Name,Thickness,Quantity\nPART-404,1.5,2\n");
    let first = provision(&config(&w), &w.reports, &AtomicBool::new(false)).unwrap();
    let input = first.not_found_report.unwrap();
    let before = fs::read_to_string(&input).unwrap();

    let mut cfg = config(&w);
    cfg.recovery.roots = vec![w.cad.clone()];
    let again = recover(&cfg, &input, &w.reports, &AtomicBool::new(false)).unwrap();

    let output = again.not_found_report.unwrap();
    assert_ne!(output, input);
    assert_eq!(fs::read_to_string(&input).unwrap(), before);
    assert_ne!(again.summary, first.summary);
  }

  #[test]
  fn stop_flag_prevents_any_work() {
    let w = workshop("Product Name,Thickness,Quantity\nPART-001,2,1\n");
    fs::write(w.cad.join("PART-001.dxf"), b"x").unwrap();

    let out = provision(&config(&w), &w.reports, &AtomicBool::new(true)).unwrap();

    assert!(out.report.interrupted);
    assert_eq!(out.report.stats.processed(), 0);
  }

  #[test]
  fn configuration_errors_map_to_exit_code_two() {
    let w = workshop("Product Name,Thickness,Quantity\n");
    let mut cfg = config(&w);
    cfg.locator.roots = vec![w.cad.join("unplugged")];

    let err = provision(&cfg, &w.reports, &AtomicBool::new(false)).unwrap_err();
    assert_eq!(exit_code(&err), 2);
    assert_eq!(exit_code(&anyhow::anyhow!("disk on fire")), 1);
  }
}
