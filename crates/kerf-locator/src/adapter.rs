use kerf_core::domain::SearchResult;
use kerf_core::ports::FileLocator as CoreFileLocator;

use crate::locator::FsFileLocator;

/// Implementación del port `FileLocator` del núcleo.
///
/// El dominio sólo ve el resultado; la traza se queda en esta capa.
impl CoreFileLocator for FsFileLocator {
  fn resolve(&self, identifier: &str) -> SearchResult {
    self.resolve_traced(identifier).result
  }
}
