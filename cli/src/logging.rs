use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use kerf_fs::create_unique;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const CRATES: [&str; 6] = ["kerf", "kerf_lib", "kerf_core", "kerf_fs", "kerf_locator", "kerf_records"];

/// Filtro por defecto si no hay `RUST_LOG`.
pub fn default_filter(verbose: bool) -> String {
  let level = if verbose { "debug" } else { "info" };
  CRATES.iter().map(|c| format!("{c}={level}")).collect::<Vec<_>>().join(",")
}

/// Dos salidas: stderr con colores y `kerf_<unix>.log` en texto plano.
///
/// Devuelve la ruta del archivo de log.
pub fn init_logging(logs_dir: &Path, verbose: bool, started_at: u64) -> Result<PathBuf> {
  fs::create_dir_all(logs_dir)
    .with_context(|| format!("Failed to create logs directory: {}", logs_dir.display()))?;

  let (log_path, file) = create_unique(logs_dir, &format!("kerf_{started_at}"), "log")
    .with_context(|| format!("Failed to create log file in {}", logs_dir.display()))?;

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

  tracing_subscriber::registry()
    .with(tracing_subscriber::fmt::layer().with_writer(Mutex::new(file)).with_ansi(false).with_filter(filter.clone()))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_filter(filter))
    .try_init()
    .context("Failed to install tracing subscriber")?;

  Ok(log_path)
}
