pub mod batch_service;

pub use batch_service::{BatchService, RecordOutcome};
