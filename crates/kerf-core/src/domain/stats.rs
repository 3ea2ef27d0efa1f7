use serde::{Deserialize, Serialize};

/// Contadores de una ejecución completa.
///
/// Sólo crecen: no hay forma de decrementarlos. Es un valor explícito que
/// pertenece a la ejecución (no un singleton global), así que una versión
/// paralela puede agregar varias instancias con [`RunStatistics::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
  processed: u64,
  copied: u64,
  not_found: u64,
  errors: u64,
  skipped: u64,
}

impl RunStatistics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record_processed(&mut self) {
    self.processed += 1;
  }

  pub fn record_copied(&mut self, count: u64) {
    self.copied += count;
  }

  pub fn record_not_found(&mut self) {
    self.not_found += 1;
  }

  pub fn record_errors(&mut self, count: u64) {
    self.errors += count;
  }

  pub fn record_skipped(&mut self) {
    self.skipped += 1;
  }

  pub fn merge(&mut self, other: &RunStatistics) {
    self.processed += other.processed;
    self.copied += other.copied;
    self.not_found += other.not_found;
    self.errors += other.errors;
    self.skipped += other.skipped;
  }

  /// Registros que pasaron la validación y llegaron a `Locate`.
  pub fn processed(&self) -> u64 {
    self.processed
  }

  /// Archivos destino escritos con éxito.
  pub fn copied(&self) -> u64 {
    self.copied
  }

  pub fn not_found(&self) -> u64 {
    self.not_found
  }

  pub fn errors(&self) -> u64 {
    self.errors
  }

  pub fn skipped(&self) -> u64 {
    self.skipped
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn merge_adds_every_counter() {
    let mut a = RunStatistics::new();
    a.record_processed();
    a.record_copied(3);

    let mut b = RunStatistics::new();
    b.record_processed();
    b.record_not_found();
    b.record_errors(2);
    b.record_skipped();

    a.merge(&b);
    assert_eq!(a.processed(), 2);
    assert_eq!(a.copied(), 3);
    assert_eq!(a.not_found(), 1);
    assert_eq!(a.errors(), 2);
    assert_eq!(a.skipped(), 1);
  }
}
