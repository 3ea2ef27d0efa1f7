use std::path::{Path, PathBuf};

use crate::domain::{CopyEntry, CopyPlan};

#[derive(Debug, thiserror::Error)]
pub enum ReplicaError {
  #[error("io error at {path}: {message}")]
  Io { path: PathBuf, message: String },

  #[error("destination already exists: {0}")]
  AlreadyExists(PathBuf),
}

/// Una copia del plan que no se pudo materializar.
#[derive(Debug)]
pub struct CopyFailure {
  pub entry: CopyEntry,
  pub error: ReplicaError,
}

/// Resultado "best effort" de ejecutar un [`CopyPlan`].
///
/// El contador de fallos es exacto; el detalle sólo se guarda para los
/// primeros [`ReplicationOutcome::KEPT_FAILURES`].
#[derive(Debug, Default)]
pub struct ReplicationOutcome {
  pub copied: u64,
  pub failures: Vec<CopyFailure>,
  failed: u64,
}

impl ReplicationOutcome {
  pub const KEPT_FAILURES: usize = 64;

  pub fn record_failure(&mut self, entry: CopyEntry, error: ReplicaError) {
    self.failed += 1;
    if self.failures.len() < Self::KEPT_FAILURES {
      self.failures.push(CopyFailure { entry, error });
    }
  }

  pub fn failed(&self) -> u64 {
    self.failed
  }
}

/// Port del motor de replicación.
///
/// `ensure_dir` es idempotente. `replicate` nunca aborta a mitad de plan:
/// cada fallo se anota con [`ReplicationOutcome::record_failure`] y se sigue
/// con la siguiente entrada.
pub trait Replicator {
  fn ensure_dir(&self, dir: &Path) -> Result<(), ReplicaError>;
  fn replicate(&self, plan: &CopyPlan) -> ReplicationOutcome;
}

impl<T: Replicator + ?Sized> Replicator for &T {
  fn ensure_dir(&self, dir: &Path) -> Result<(), ReplicaError> {
    (**self).ensure_dir(dir)
  }

  fn replicate(&self, plan: &CopyPlan) -> ReplicationOutcome {
    (**self).replicate(plan)
  }
}
