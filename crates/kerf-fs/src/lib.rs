pub mod config;
pub mod io;
pub mod replicator;
pub mod walker;

pub use config::ReplicaConfig;
pub use io::{FsError, atomic_write_str, copy_preserving, create_unique, ensure_dir};
pub use replicator::FsReplicator;
pub use walker::{DirVisit, Flow, Listing, WalkLimits, WalkSummary, list_dir, walk_bounded};
