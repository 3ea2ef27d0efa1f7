use crate::domain::{BatchReport, DestinationPath, Record, SkipReason, ValidatedRecord};
use crate::errors::CoreError;
use crate::ports::replicator::ReplicationOutcome;

// El CLI implementa esto para volcar el progreso a los logs.
pub trait ProgressReporter {
  fn on_skipped(&self, record: &Record, reason: &SkipReason);
  fn on_not_found(&self, record: &ValidatedRecord);
  fn on_placed(&self, record: &ValidatedRecord, destination: &DestinationPath, outcome: &ReplicationOutcome);
  fn on_error(&self, record: &ValidatedRecord, error: &CoreError);
  fn finish(&self, report: &BatchReport);
}

/// Reporter que no hace nada. Útil en tests y en usos embebidos.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
  fn on_skipped(&self, _record: &Record, _reason: &SkipReason) {}
  fn on_not_found(&self, _record: &ValidatedRecord) {}
  fn on_placed(&self, _record: &ValidatedRecord, _destination: &DestinationPath, _outcome: &ReplicationOutcome) {}
  fn on_error(&self, _record: &ValidatedRecord, _error: &CoreError) {}
  fn finish(&self, _report: &BatchReport) {}
}
