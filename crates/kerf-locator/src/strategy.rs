use std::fmt;
use std::path::{Path, PathBuf};

use kerf_fs::{Flow, WalkLimits, WalkSummary, walk_bounded};
use tracing::debug;

use crate::probe::{exact_in_dir, names_identifier, partial_in_files};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
  RootExact,
  BoundedTree,
  ShallowPartial,
  Proxy,
}

impl fmt::Display for StrategyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StrategyKind::RootExact => write!(f, "root-exact"),
      StrategyKind::BoundedTree => write!(f, "bounded-tree"),
      StrategyKind::ShallowPartial => write!(f, "shallow-partial"),
      StrategyKind::Proxy => write!(f, "proxy"),
    }
  }
}

/// What one `resolve` call did. Counters accumulate over every root tried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTrace {
  /// Index of the root that produced the result, if any.
  pub root_index: Option<usize>,
  pub strategy: Option<StrategyKind>,
  pub dirs_visited: usize,
  pub dir_errors: usize,
  pub short_circuited: bool,
  /// A bounded walk hit its directory cap with work left.
  pub truncated: bool,
  /// Roots that could not be read at all.
  pub unreadable_roots: usize,
}

impl SearchTrace {
  fn absorb(&mut self, walk: &WalkSummary) {
    self.dirs_visited += walk.dirs_visited;
    self.dir_errors += walk.errors + usize::from(walk.root_error.is_some());
    self.short_circuited |= walk.short_circuited;
    self.truncated |= walk.truncated;
  }
}

/// One rung of the escalation ladder. Strategies are tried in a fixed order and
/// the first non-empty answer wins.
pub trait SearchStrategy: Send + Sync {
  fn kind(&self) -> StrategyKind;
  fn try_resolve(&self, identifier: &str, root: &Path, trace: &mut SearchTrace) -> Vec<PathBuf>;
}

/// Step 1: O(extensions) stat calls at the root, no traversal.
pub struct RootExact {
  pub extensions: Vec<String>,
}

impl SearchStrategy for RootExact {
  fn kind(&self) -> StrategyKind {
    StrategyKind::RootExact
  }

  fn try_resolve(&self, identifier: &str, root: &Path, _trace: &mut SearchTrace) -> Vec<PathBuf> {
    exact_in_dir(root, identifier, &self.extensions)
  }
}

/// Step 2: breadth-first walk repeating the exact check in every directory.
///
/// Stops at the first directory with a hit; deeper or later siblings are never
/// looked at, even if they hold "better" matches.
pub struct BoundedTree {
  pub extensions: Vec<String>,
  pub limits: WalkLimits,
}

impl SearchStrategy for BoundedTree {
  fn kind(&self) -> StrategyKind {
    StrategyKind::BoundedTree
  }

  fn try_resolve(&self, identifier: &str, root: &Path, trace: &mut SearchTrace) -> Vec<PathBuf> {
    let mut found = Vec::new();

    let walk = walk_bounded(root, &self.limits, |visit| {
      // The root itself was already covered by RootExact.
      if visit.depth == 0 {
        return Flow::Continue;
      }

      found = exact_in_dir(visit.path, identifier, &self.extensions);
      if found.is_empty() { Flow::Continue } else { Flow::Stop }
    });

    trace.absorb(&walk);
    if walk.truncated {
      debug!(root = %root.display(), visited = walk.dirs_visited, "directory cap reached for '{identifier}'");
    }

    found
  }
}

/// Step 3: substring match on file names in the root and its immediate children.
///
/// Bounded by the same per-root visit cap as the breadth-first pass.
pub struct ShallowPartial {
  pub extensions: Vec<String>,
  pub limits: WalkLimits,
}

impl SearchStrategy for ShallowPartial {
  fn kind(&self) -> StrategyKind {
    StrategyKind::ShallowPartial
  }

  fn try_resolve(&self, identifier: &str, root: &Path, trace: &mut SearchTrace) -> Vec<PathBuf> {
    let limits = WalkLimits { max_depth: self.limits.max_depth.min(1), ..self.limits.clone() };

    let mut files = Vec::new();
    let walk = walk_bounded(root, &limits, |visit| {
      files.extend_from_slice(visit.files);
      Flow::Continue
    });

    trace.absorb(&walk);
    if walk.truncated {
      debug!(root = %root.display(), visited = walk.dirs_visited, "directory cap reached listing top-level folders");
    }

    partial_in_files(&files, identifier, &self.extensions)
  }
}

/// Locate-by-proxy: find any artifact naming the identifier, then look for the
/// target type only in that artifact's folder (exact name first, substring second).
///
/// Sibling files for one product are assumed to live together, so the second
/// step never traverses again.
pub struct Proxy {
  pub target_extension: String,
  pub limits: WalkLimits,
}

impl SearchStrategy for Proxy {
  fn kind(&self) -> StrategyKind {
    StrategyKind::Proxy
  }

  fn try_resolve(&self, identifier: &str, root: &Path, trace: &mut SearchTrace) -> Vec<PathBuf> {
    let mut anchor: Option<(PathBuf, Vec<PathBuf>)> = None;

    let walk = walk_bounded(root, &self.limits, |visit| {
      if visit.files.iter().any(|f| names_identifier(f, identifier)) {
        anchor = Some((visit.path.to_path_buf(), visit.files.to_vec()));
        Flow::Stop
      } else {
        Flow::Continue
      }
    });
    trace.absorb(&walk);

    let Some((dir, siblings)) = anchor else {
      return Vec::new();
    };
    debug!(dir = %dir.display(), "proxy anchor for '{identifier}'");

    let target = std::slice::from_ref(&self.target_extension);
    let exact = exact_in_dir(&dir, identifier, target);
    if !exact.is_empty() {
      return exact;
    }

    partial_in_files(&siblings, identifier, target)
  }
}
