pub mod locator;
pub mod progress;
pub mod replicator;

pub use locator::FileLocator;
pub use progress::{ProgressReporter, SilentReporter};
pub use replicator::{CopyFailure, ReplicaError, ReplicationOutcome, Replicator};
