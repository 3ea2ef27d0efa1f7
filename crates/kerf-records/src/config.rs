use kerf_config::{ConfigBackend, ConfigError, TomlConfigBackend};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MATERIAL_PREFIX: &str = "Copy of THICKNESS AND MATERIAL DATA - ";

/// Sección `[records]` de kerf.toml.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecordsConfig {
  /// Directorio con los CSV de entrada. Se puede pasar también por CLI.
  #[serde(default)]
  pub csv_dir: Option<PathBuf>,

  /// Prefijo que se quita del nombre del CSV para obtener el material.
  #[serde(default = "default_material_prefix")]
  pub material_prefix: String,
}

fn default_material_prefix() -> String {
  DEFAULT_MATERIAL_PREFIX.to_string()
}

impl Default for RecordsConfig {
  fn default() -> Self {
    RecordsConfig { csv_dir: None, material_prefix: default_material_prefix() }
  }
}

impl RecordsConfig {
  pub fn load(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    backend.load_section_with_default("records")
  }

  pub fn save(&self, backend: &TomlConfigBackend) -> Result<(), ConfigError> {
    backend.save_section("records", self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn round_trips_through_backend() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::at(tmp.path().join("kerf.toml"));

    assert_eq!(RecordsConfig::load(&backend).unwrap(), RecordsConfig::default());

    let cfg = RecordsConfig { csv_dir: Some("/data/orders".into()), material_prefix: "Order - ".into() };
    cfg.save(&backend).unwrap();
    assert_eq!(RecordsConfig::load(&backend).unwrap(), cfg);
  }
}
