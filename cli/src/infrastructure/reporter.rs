use kerf_core::CoreError;
use kerf_core::domain::{BatchReport, DestinationPath, Record, SkipReason, ValidatedRecord};
use kerf_core::ports::{ProgressReporter, ReplicationOutcome};
use tracing::{error, info, warn};

/// A `ProgressReporter` that turns batch events into log lines.
///
/// Per-file copy lines come from the replicator; this only reports one line per
/// record plus the final totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
  fn on_skipped(&self, record: &Record, reason: &SkipReason) {
    warn!(row = %record.row, "skipped '{}': {reason}", record.identifier);
  }

  fn on_not_found(&self, record: &ValidatedRecord) {
    warn!(row = %record.row, "not found: {}", record.identifier);
  }

  fn on_placed(&self, record: &ValidatedRecord, destination: &DestinationPath, outcome: &ReplicationOutcome) {
    if outcome.failed() == 0 {
      info!(row = %record.row, "{}: {} file(s) -> {}", record.identifier, outcome.copied, destination.as_path().display());
    } else {
      warn!(
        row = %record.row,
        "{}: {} file(s) -> {}, {} failed",
        record.identifier,
        outcome.copied,
        destination.as_path().display(),
        outcome.failed()
      );
    }
  }

  fn on_error(&self, record: &ValidatedRecord, err: &CoreError) {
    error!(row = %record.row, "{}: {err}", record.identifier);
  }

  fn finish(&self, report: &BatchReport) {
    let s = &report.stats;
    info!(
      processed = s.processed(),
      copied = s.copied(),
      not_found = s.not_found(),
      errors = s.errors(),
      skipped = s.skipped(),
      elapsed_ms = report.elapsed.as_millis() as u64,
      interrupted = report.interrupted,
      "batch finished"
    );
  }
}
