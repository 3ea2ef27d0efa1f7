use std::fs;
use std::path::Path;

use kerf_core::domain::CopyPlan;
use kerf_core::ports::{ReplicaError, ReplicationOutcome, Replicator};
use tracing::{error, info};

use crate::config::ReplicaConfig;
use crate::io::{FsError, copy_preserving, ensure_dir};

/// Implementación de `Replicator` sobre el sistema de archivos local (o
/// montado por red).
///
/// Cada entrada del plan se copia por separado: un fallo no aborta las
/// siguientes ni deshace las que ya se copiaron.
#[derive(Debug, Clone, Default)]
pub struct FsReplicator {
  cfg: ReplicaConfig,
}

impl FsReplicator {
  pub fn new(cfg: ReplicaConfig) -> Self {
    Self { cfg }
  }
}

impl Replicator for FsReplicator {
  fn ensure_dir(&self, dir: &Path) -> Result<(), ReplicaError> {
    ensure_dir(dir).map_err(|e| match e {
      FsError::Io(io) => ReplicaError::Io { path: dir.to_path_buf(), message: io.to_string() },
      FsError::NotADirectory(p) => ReplicaError::Io { path: p, message: "exists and is not a directory".into() },
    })
  }

  fn replicate(&self, plan: &CopyPlan) -> ReplicationOutcome {
    let mut outcome = ReplicationOutcome::default();

    for entry in plan.entries() {
      if !self.cfg.overwrite && fs::symlink_metadata(&entry.destination).is_ok() {
        error!(destination = %entry.destination.display(), "destination exists, not overwriting");
        let error = ReplicaError::AlreadyExists(entry.destination.clone());
        outcome.record_failure(entry, error);
        continue;
      }

      match copy_preserving(&entry.source, &entry.destination, self.cfg.preserve_times) {
        Ok(_) => {
          info!("Copied: {} -> {}", entry.source.display(), entry.destination.display());
          outcome.copied += 1;
        }
        Err(e) => {
          error!("Error copying {} to {}: {e}", entry.source.display(), entry.destination.display());
          let error = ReplicaError::Io { path: entry.destination.clone(), message: e.to_string() };
          outcome.record_failure(entry, error);
        }
      }
    }

    outcome
  }
}
