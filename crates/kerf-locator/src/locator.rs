use std::fs;
use std::path::{Path, PathBuf};

use kerf_core::domain::SearchResult;
use kerf_fs::WalkLimits;
use tracing::{debug, warn};

use crate::config::{LocatorConfig, LocatorError, normalize_target_extension};
use crate::probe::is_searchable;
use crate::strategy::{BoundedTree, Proxy, RootExact, SearchStrategy, SearchTrace, ShallowPartial};

/// Result of one lookup plus the trace of how it was obtained.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
  pub result: SearchResult,
  pub trace: SearchTrace,
}

/// Multi-root, multi-strategy file locator.
///
/// # Logic
/// * Roots are tried in configured order; the first root with any match wins and
///   later roots are never touched.
/// * Inside a root, strategies run in a fixed order from cheapest to most
///   expensive; the first non-empty answer wins.
/// * Matches are canonicalized and deduplicated, keeping discovery order.
///
/// Nothing here returns an error: unreadable directories are skipped, an
/// unreadable root simply yields nothing and the next root is tried.
pub struct FsFileLocator {
  roots: Vec<PathBuf>,
  strategies: Vec<Box<dyn SearchStrategy>>,
}

impl FsFileLocator {
  pub fn with_strategies(roots: Vec<PathBuf>, strategies: Vec<Box<dyn SearchStrategy>>) -> Self {
    Self { roots, strategies }
  }

  /// Root exact pass → bounded breadth-first pass → shallow partial pass.
  pub fn standard(cfg: &LocatorConfig) -> Self {
    let extensions = cfg.normalized_extensions();
    let strategies: Vec<Box<dyn SearchStrategy>> = vec![
      Box::new(RootExact { extensions: extensions.clone() }),
      Box::new(BoundedTree { extensions: extensions.clone(), limits: cfg.walk_limits() }),
      Box::new(ShallowPartial { extensions, limits: cfg.walk_limits() }),
    ];
    Self::with_strategies(cfg.roots.clone(), strategies)
  }

  /// Single-type lookup through a sibling artifact (recovery pass).
  pub fn by_proxy(roots: Vec<PathBuf>, target_extension: &str, limits: WalkLimits) -> Result<Self, LocatorError> {
    let target_extension = normalize_target_extension(target_extension)?;
    let strategies: Vec<Box<dyn SearchStrategy>> = vec![Box::new(Proxy { target_extension, limits })];
    Ok(Self::with_strategies(roots, strategies))
  }

  pub fn roots(&self) -> &[PathBuf] {
    &self.roots
  }

  pub fn resolve_traced(&self, identifier: &str) -> Resolution {
    let mut trace = SearchTrace::default();

    if !is_searchable(identifier) {
      debug!("identifier '{identifier}' cannot name a file, skipping search");
      return Resolution { result: SearchResult::new(), trace };
    }

    for (index, root) in self.roots.iter().enumerate() {
      if !root_is_readable(root) {
        warn!(root = %root.display(), "source root is not accessible, skipping it");
        trace.unreadable_roots += 1;
        continue;
      }

      for strategy in &self.strategies {
        let found = strategy.try_resolve(identifier, root, &mut trace);
        if found.is_empty() {
          continue;
        }

        trace.root_index = Some(index);
        trace.strategy = Some(strategy.kind());
        debug!(
          root = %root.display(),
          strategy = %strategy.kind(),
          visited = trace.dirs_visited,
          "found {} file(s) for '{identifier}'",
          found.len()
        );

        let result = found.into_iter().map(|p| canonical(&p)).collect();
        return Resolution { result, trace };
      }
    }

    Resolution { result: SearchResult::new(), trace }
  }
}

fn root_is_readable(root: &Path) -> bool {
  fs::metadata(root).map(|m| m.is_dir()).unwrap_or(false)
}

fn canonical(path: &Path) -> PathBuf {
  fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
