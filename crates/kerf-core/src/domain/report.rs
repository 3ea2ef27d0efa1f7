use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::record::{Record, ValidatedRecord};
use crate::domain::stats::RunStatistics;

/// Registro válido que no produjo ningún archivo.
///
/// Lleva lo necesario para una pasada de recuperación posterior contra una
/// raíz más acotada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotFoundEntry {
  pub identifier: String,
  pub material: String,
  pub thickness: String,
  pub quantity: u32,
  pub row: String,
}

impl NotFoundEntry {
  /// Vuelve a convertir la entrada en un registro para la pasada de recuperación.
  pub fn to_record(&self) -> Record {
    Record::new(
      self.row.clone(),
      self.identifier.clone(),
      self.material.clone(),
      self.thickness.clone(),
      self.quantity.to_string(),
    )
  }
}

impl From<&ValidatedRecord> for NotFoundEntry {
  fn from(r: &ValidatedRecord) -> Self {
    NotFoundEntry {
      identifier: r.identifier.clone(),
      material: r.material.clone(),
      thickness: r.thickness.clone(),
      quantity: r.quantity.get(),
      row: r.row.clone(),
    }
  }
}

/// Resultado final de un batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
  pub stats: RunStatistics,
  pub elapsed: Duration,
  pub not_found: Vec<NotFoundEntry>,
  /// `true` si se pidió parar antes de consumir todos los registros.
  pub interrupted: bool,
}
