//! Cheap per-directory checks shared by the search strategies.

use std::path::{Path, PathBuf};

/// Checks if a file path has the given extension. Comparisons are case-insensitive.
pub fn has_extension(path: &Path, ext: &str) -> bool {
  path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn file_name(path: &Path) -> Option<&str> {
  path.file_name().and_then(|n| n.to_str())
}

/// Tests `<dir>/<identifier>.<ext>` and `<dir>/<identifier>.<EXT>` for every
/// extension, in allowlist order. Only stat calls, no directory listing.
pub fn exact_in_dir(dir: &Path, identifier: &str, extensions: &[String]) -> Vec<PathBuf> {
  let mut found = Vec::new();

  for ext in extensions {
    let upper = ext.to_ascii_uppercase();
    let mut variants = vec![ext.as_str()];
    if upper != *ext {
      variants.push(upper.as_str());
    }

    for variant in variants {
      let candidate = dir.join(format!("{identifier}.{variant}"));
      if candidate.is_file() && !found.contains(&candidate) {
        found.push(candidate);
      }
    }
  }

  found
}

/// Files (from an already sorted listing) whose name contains `identifier`,
/// grouped by allowlist order.
pub fn partial_in_files(files: &[PathBuf], identifier: &str, extensions: &[String]) -> Vec<PathBuf> {
  let mut found = Vec::new();

  for ext in extensions {
    for f in files {
      let Some(name) = file_name(f) else { continue };
      if name.contains(identifier) && has_extension(f, ext) && !found.contains(f) {
        found.push(f.clone());
      }
    }
  }

  found
}

/// A sibling artifact of any type whose name contains the identifier (an exact
/// stem is just the tightest case of that).
pub fn names_identifier(path: &Path, identifier: &str) -> bool {
  file_name(path).is_some_and(|n| n.contains(identifier))
}

/// Identifiers that could never name a single file, or could walk out of the root.
pub fn is_searchable(identifier: &str) -> bool {
  !identifier.is_empty() && !identifier.contains(['/', '\\', '\0']) && identifier != "." && identifier != ".."
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  fn exts(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn exact_checks_lower_and_upper_variants() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("PART-001.DXF"), b"").unwrap();
    fs::write(tmp.path().join("PART-001.dwg"), b"").unwrap();
    fs::write(tmp.path().join("PART-0011.dwg"), b"").unwrap();

    let found = exact_in_dir(tmp.path(), "PART-001", &exts(&["dwg", "dxf"]));

    assert_eq!(found, vec![tmp.path().join("PART-001.dwg"), tmp.path().join("PART-001.DXF")]);
  }

  #[test]
  fn exact_ignores_directories_with_matching_names() {
    let tmp = tempdir().unwrap();
    fs::create_dir(tmp.path().join("PART-001.dxf")).unwrap();

    assert!(exact_in_dir(tmp.path(), "PART-001", &exts(&["dxf"])).is_empty());
  }

  #[test]
  fn partial_groups_by_extension_order() {
    let files = vec![
      PathBuf::from("/r/A PART-7 rev2.DXF"),
      PathBuf::from("/r/PART-7.pdf"),
      PathBuf::from("/r/old PART-7.dwg"),
    ];

    let found = partial_in_files(&files, "PART-7", &exts(&["dwg", "dxf"]));

    assert_eq!(found, vec![PathBuf::from("/r/old PART-7.dwg"), PathBuf::from("/r/A PART-7 rev2.DXF")]);
  }

  #[test]
  fn proxy_names_match_stem_or_substring() {
    assert!(names_identifier(Path::new("/r/X-1.pdf"), "X-1"));
    assert!(names_identifier(Path::new("/r/assy X-1 v2.step"), "X-1"));
    assert!(!names_identifier(Path::new("/r/X-2.pdf"), "X-1"));
  }

  #[test]
  fn separators_are_not_searchable() {
    assert!(is_searchable("DR02-04-16-003_R3"));
    assert!(!is_searchable("../etc/passwd"));
    assert!(!is_searchable(""));
    assert!(!is_searchable(".."));
  }
}
