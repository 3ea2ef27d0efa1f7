use serde::{Deserialize, Serialize};

/// Sección `[replica]` de kerf.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaConfig {
  /// Sobrescribir archivos destino existentes. Si es `false`, un destino que
  /// ya existe cuenta como fallo de esa copia.
  #[serde(default = "default_true")]
  pub overwrite: bool,

  /// Conservar fecha de modificación/acceso del origen.
  #[serde(default = "default_true")]
  pub preserve_times: bool,
}

fn default_true() -> bool {
  true
}

impl Default for ReplicaConfig {
  fn default() -> Self {
    Self { overwrite: true, preserve_times: true }
  }
}
