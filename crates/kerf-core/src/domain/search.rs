use std::path::{Path, PathBuf};

/// Archivos encontrados para un identificador, en orden de descubrimiento.
///
/// Se deduplica por identidad de ruta: el adapter entrega rutas ya
/// canonicalizadas, así que `a/../b/x.dxf` y `b/x.dxf` cuentan una sola vez.
/// Un resultado vacío es un desenlace válido ("not found").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
  files: Vec<PathBuf>,
}

impl SearchResult {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserta conservando el orden. Devuelve `false` si ya estaba.
  pub fn push(&mut self, path: PathBuf) -> bool {
    if self.files.iter().any(|p| p == &path) {
      return false;
    }
    self.files.push(path);
    true
  }

  pub fn extend(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
    for p in paths {
      self.push(p);
    }
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }

  pub fn len(&self) -> usize {
    self.files.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
    self.files.iter()
  }

  pub fn contains(&self, path: &Path) -> bool {
    self.files.iter().any(|p| p == path)
  }

  pub fn into_vec(self) -> Vec<PathBuf> {
    self.files
  }
}

impl FromIterator<PathBuf> for SearchResult {
  fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
    let mut result = SearchResult::new();
    result.extend(iter);
    result
  }
}

impl IntoIterator for SearchResult {
  type Item = PathBuf;
  type IntoIter = std::vec::IntoIter<PathBuf>;

  fn into_iter(self) -> Self::IntoIter {
    self.files.into_iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keeps_discovery_order_and_drops_duplicates() {
    let result: SearchResult =
      ["/b/x.dxf", "/a/x.dxf", "/b/x.dxf"].into_iter().map(PathBuf::from).collect();

    assert_eq!(result.len(), 2);
    assert_eq!(result.into_vec(), vec![PathBuf::from("/b/x.dxf"), PathBuf::from("/a/x.dxf")]);
  }
}
