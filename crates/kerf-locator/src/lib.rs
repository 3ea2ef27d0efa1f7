pub mod adapter;
pub mod config;
pub mod locator;
pub mod probe;
pub mod strategy;

pub use config::{LocatorConfig, LocatorError, RecoveryConfig};
pub use locator::{FsFileLocator, Resolution};
pub use strategy::{SearchStrategy, SearchTrace, StrategyKind};
