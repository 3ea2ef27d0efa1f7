use crate::domain::SearchResult;

/// Port del motor de búsqueda de archivos.
///
/// Las raíces y la lista de extensiones las fija el adapter al construirse;
/// desde el dominio sólo se pide "resuelve este identificador". Nunca falla:
/// los errores de E/S durante el recorrido se absorben y, en el peor caso,
/// el resultado es vacío (not found).
pub trait FileLocator {
  fn resolve(&self, identifier: &str) -> SearchResult;
}

impl<T: FileLocator + ?Sized> FileLocator for &T {
  fn resolve(&self, identifier: &str) -> SearchResult {
    (**self).resolve(identifier)
  }
}
