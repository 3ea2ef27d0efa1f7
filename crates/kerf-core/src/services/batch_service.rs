use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, info};

use crate::domain::{
  BatchReport, CopyPlan, DestinationPath, NotFoundEntry, Record, RunStatistics, SkipReason,
};
use crate::errors::CoreError;
use crate::ports::{FileLocator, ProgressReporter, Replicator};

/// Estado terminal de un registro dentro del batch.
#[derive(Debug)]
pub enum RecordOutcome {
  Skipped(SkipReason),
  NotFound(NotFoundEntry),
  Placed { copied: u64, failed: u64 },
  Failed(CoreError),
}

/// Orquestador del batch: `Validate → Locate → (NotFound | Place)`.
pub struct BatchService<L, R, P>
where
  L: FileLocator,
  R: Replicator,
  P: ProgressReporter,
{
  locator: L,
  replicator: R,
  reporter: P,
  destination_base: PathBuf,
}

impl<L, R, P> BatchService<L, R, P>
where
  L: FileLocator,
  R: Replicator,
  P: ProgressReporter,
{
  pub fn new(locator: L, replicator: R, reporter: P, destination_base: impl Into<PathBuf>) -> Self {
    Self { locator, replicator, reporter, destination_base: destination_base.into() }
  }

  pub fn destination_base(&self) -> &Path {
    &self.destination_base
  }

  /// Procesa los registros uno a uno, en orden de entrada.
  ///
  /// `stop` se consulta entre registros: si se activa, no se empieza ninguno
  /// más y el informe queda marcado como interrumpido. Un registro ya en
  /// curso siempre termina.
  pub fn run<I>(&self, records: I, stop: Option<&AtomicBool>) -> BatchReport
  where
    I: IntoIterator<Item = Record>,
  {
    let started = Instant::now();
    let mut report = BatchReport::default();

    for record in records {
      if stop.is_some_and(|s| s.load(Ordering::Relaxed)) {
        info!("stop requested, not starting further records");
        report.interrupted = true;
        break;
      }

      if let RecordOutcome::NotFound(entry) = self.process(&record, &mut report.stats) {
        report.not_found.push(entry);
      }
    }

    report.elapsed = started.elapsed();
    self.reporter.finish(&report);
    report
  }

  /// Lleva un único registro hasta su estado terminal y actualiza `stats`.
  pub fn process(&self, record: &Record, stats: &mut RunStatistics) -> RecordOutcome {
    // 1) Validate
    let valid = match record.validate() {
      Ok(v) => v,
      Err(reason) => {
        stats.record_skipped();
        self.reporter.on_skipped(record, &reason);
        return RecordOutcome::Skipped(reason);
      }
    };

    stats.record_processed();

    // 2) Locate
    let found = self.locator.resolve(&valid.identifier);
    if found.is_empty() {
      stats.record_not_found();
      self.reporter.on_not_found(&valid);
      return RecordOutcome::NotFound(NotFoundEntry::from(&valid));
    }
    debug!(identifier = %valid.identifier, files = found.len(), "located source files");

    // 3) Place
    let destination = DestinationPath::new(&self.destination_base, &valid.material, &valid.thickness);

    if let Err(e) = self.replicator.ensure_dir(destination.as_path()) {
      let err = CoreError::Destination(e.to_string());
      stats.record_errors(1);
      self.reporter.on_error(&valid, &err);
      return RecordOutcome::Failed(err);
    }

    let plan = match CopyPlan::build(&found, &destination, valid.quantity) {
      Ok(p) => p,
      Err(err) => {
        stats.record_errors(1);
        self.reporter.on_error(&valid, &err);
        return RecordOutcome::Failed(err);
      }
    };

    let outcome = self.replicator.replicate(&plan);
    stats.record_copied(outcome.copied);
    stats.record_errors(outcome.failed());
    self.reporter.on_placed(&valid, &destination, &outcome);

    RecordOutcome::Placed { copied: outcome.copied, failed: outcome.failed() }
  }
}
