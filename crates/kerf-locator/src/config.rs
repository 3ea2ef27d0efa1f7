use kerf_config::{ConfigBackend, ConfigError, TomlConfigBackend};
use kerf_fs::WalkLimits;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocatorError {
  #[error("no source roots configured")]
  NoRoots,

  #[error("extension allowlist is empty")]
  NoExtensions,

  #[error("max_dirs_per_root must be at least 1")]
  ZeroVisitCap,

  #[error("recovery target extension is empty")]
  NoTargetExtension,
}

/// Sección `[locator]` de kerf.toml.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocatorConfig {
  /// Raíces de búsqueda, en orden de prioridad. La primera que produce
  /// resultados gana.
  #[serde(default)]
  pub roots: Vec<PathBuf>,

  /// Extensiones CAD válidas (sin punto, sin distinguir mayúsculas).
  #[serde(default = "default_extensions")]
  pub extensions: Vec<String>,

  /// Niveles bajo la raíz que el recorrido en anchura puede bajar.
  #[serde(default = "default_max_depth")]
  pub max_depth: usize,

  /// Tope duro de directorios visitados por raíz.
  #[serde(default = "default_max_dirs")]
  pub max_dirs_per_root: usize,

  #[serde(default)]
  pub follow_symlinks: bool,
}

fn default_extensions() -> Vec<String> {
  ["dwg", "dxf", "step", "stp", "iges", "igs", "sat", "3dm", "catpart", "catproduct", "prt", "asm"]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_max_depth() -> usize {
  7
}

fn default_max_dirs() -> usize {
  300
}

impl Default for LocatorConfig {
  fn default() -> Self {
    LocatorConfig {
      roots: Vec::new(),
      extensions: default_extensions(),
      max_depth: default_max_depth(),
      max_dirs_per_root: default_max_dirs(),
      follow_symlinks: false,
    }
  }
}

impl LocatorConfig {
  pub fn load(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    backend.load_section_with_default("locator")
  }

  pub fn save(&self, backend: &TomlConfigBackend) -> Result<(), ConfigError> {
    backend.save_section("locator", self)
  }

  /// Minúsculas, sin punto inicial, sin vacíos ni duplicados; conserva el orden.
  pub fn normalized_extensions(&self) -> Vec<String> {
    normalize_extensions(&self.extensions)
  }

  pub fn walk_limits(&self) -> WalkLimits {
    WalkLimits {
      max_depth: self.max_depth,
      max_dirs: self.max_dirs_per_root,
      follow_symlinks: self.follow_symlinks,
      dedup_dirs: true,
    }
  }

  pub fn validate(&self) -> Result<(), LocatorError> {
    if self.roots.is_empty() {
      return Err(LocatorError::NoRoots);
    }
    if self.normalized_extensions().is_empty() {
      return Err(LocatorError::NoExtensions);
    }
    if self.max_dirs_per_root == 0 {
      return Err(LocatorError::ZeroVisitCap);
    }
    Ok(())
  }
}

pub fn normalize_extensions(raw: &[String]) -> Vec<String> {
  let mut out: Vec<String> = Vec::with_capacity(raw.len());
  for ext in raw {
    let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
    if !ext.is_empty() && !out.contains(&ext) {
      out.push(ext);
    }
  }
  out
}

/// Una sola extensión normalizada; vacía (o sólo `.`) es un error.
pub fn normalize_target_extension(raw: &str) -> Result<String, LocatorError> {
  normalize_extensions(&[raw.to_string()]).into_iter().next().ok_or(LocatorError::NoTargetExtension)
}

/// Sección `[recovery]`: la pasada de recuperación busca un único tipo de
/// archivo en una raíz curada a mano.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecoveryConfig {
  /// Sólo se usa la primera.
  #[serde(default)]
  pub roots: Vec<PathBuf>,

  #[serde(default = "default_target_extension")]
  pub target_extension: String,
}

fn default_target_extension() -> String {
  "dxf".into()
}

impl Default for RecoveryConfig {
  fn default() -> Self {
    RecoveryConfig { roots: Vec::new(), target_extension: default_target_extension() }
  }
}

impl RecoveryConfig {
  pub fn target_extension(&self) -> Result<String, LocatorError> {
    normalize_target_extension(&self.target_extension)
  }

  pub fn load(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    backend.load_section_with_default("recovery")
  }

  pub fn save(&self, backend: &TomlConfigBackend) -> Result<(), ConfigError> {
    backend.save_section("recovery", self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extensions_are_normalized_in_order() {
    let raw = vec![".DXF".to_string(), "dwg".into(), " dxf ".into(), "".into(), "Step".into()];
    assert_eq!(normalize_extensions(&raw), vec!["dxf", "dwg", "step"]);
  }

  #[test]
  fn validation_catches_unusable_configs() {
    let mut cfg = LocatorConfig::default();
    assert_eq!(cfg.validate(), Err(LocatorError::NoRoots));

    cfg.roots.push("/mnt/cad".into());
    assert_eq!(cfg.validate(), Ok(()));

    cfg.extensions = vec![" . ".into()];
    assert_eq!(cfg.validate(), Err(LocatorError::NoExtensions));

    cfg.extensions = default_extensions();
    cfg.max_dirs_per_root = 0;
    assert_eq!(cfg.validate(), Err(LocatorError::ZeroVisitCap));
  }

  #[test]
  fn recovery_target_extension_must_be_usable() {
    let mut rec = RecoveryConfig::default();
    assert_eq!(rec.target_extension(), Ok("dxf".to_string()));

    rec.target_extension = ".STEP".into();
    assert_eq!(rec.target_extension(), Ok("step".to_string()));

    for bad in ["", ".", "  "] {
      rec.target_extension = bad.into();
      assert_eq!(rec.target_extension(), Err(LocatorError::NoTargetExtension));
    }
  }
}
