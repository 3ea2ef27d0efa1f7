pub mod destination;
pub mod plan;
pub mod record;
pub mod report;
pub mod search;
pub mod stats;

pub use destination::{DestinationPath, UNKNOWN_SENTINEL};
pub use plan::{CopyEntry, CopyPlan};
pub use record::{Quantity, Record, SkipReason, ValidatedRecord};
pub use report::{BatchReport, NotFoundEntry};
pub use search::SearchResult;
pub use stats::RunStatistics;
