use std::path::PathBuf;

use kerf_config::{ConfigBackend, ConfigError, TomlConfigBackend};
use kerf_fs::ReplicaConfig;
use kerf_locator::{LocatorConfig, RecoveryConfig};
use kerf_records::RecordsConfig;
use serde::{Deserialize, Serialize};

use crate::cli::{RecoverArgs, RunArgs};

/// Sección `[output]` de kerf.toml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
  /// Base de `<material>/<espesor>`.
  #[serde(default)]
  pub destination: Option<PathBuf>,
}

/// Configuración efectiva: todas las secciones de kerf.toml más los flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppConfig {
  pub locator: LocatorConfig,
  pub recovery: RecoveryConfig,
  pub records: RecordsConfig,
  pub replica: ReplicaConfig,
  pub output: OutputConfig,
}

impl AppConfig {
  pub fn load(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    Ok(AppConfig {
      locator: LocatorConfig::load(backend)?,
      recovery: RecoveryConfig::load(backend)?,
      records: RecordsConfig::load(backend)?,
      replica: backend.load_section_with_default("replica")?,
      output: backend.load_section_with_default("output")?,
    })
  }

  /// Guarda sección a sección; lo demás del archivo (y sus comentarios) no se toca.
  pub fn save(&self, backend: &TomlConfigBackend) -> Result<(), ConfigError> {
    self.locator.save(backend)?;
    self.recovery.save(backend)?;
    self.records.save(backend)?;
    backend.save_section("replica", &self.replica)?;
    backend.save_section("output", &self.output)?;
    Ok(())
  }

  pub fn apply_run_args(&mut self, args: &RunArgs) {
    if let Some(dir) = &args.csv_dir {
      self.records.csv_dir = Some(dir.clone());
    }
    if let Some(dest) = &args.dest {
      self.output.destination = Some(dest.clone());
    }
    if !args.roots.is_empty() {
      self.locator.roots = args.roots.clone();
    }
    if let Some(depth) = args.max_depth {
      self.locator.max_depth = depth;
    }
    if let Some(cap) = args.max_dirs {
      self.locator.max_dirs_per_root = cap;
    }
    if args.no_overwrite {
      self.replica.overwrite = false;
    }
  }

  pub fn apply_recover_args(&mut self, args: &RecoverArgs) {
    if let Some(root) = &args.root {
      self.recovery.roots = vec![root.clone()];
    }
    if let Some(dest) = &args.dest {
      self.output.destination = Some(dest.clone());
    }
    if let Some(ext) = &args.ext {
      self.recovery.target_extension = ext.clone();
    }
  }
}
