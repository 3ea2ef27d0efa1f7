use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use crate::domain::destination::DestinationPath;
use crate::domain::record::Quantity;
use crate::domain::search::SearchResult;
use crate::errors::CoreError;

/// Un par (origen, destino) del plan de copia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyEntry {
  pub source: PathBuf,
  pub destination: PathBuf,
}

/// Conjunto completo de copias derivado de un registro.
///
/// Con cantidad 1 el nombre del archivo se conserva; con cantidad N > 1 cada
/// archivo origen produce `1_<nombre>` .. `N_<nombre>`, de forma independiente
/// para cada archivo encontrado.
///
/// Las entradas se generan bajo demanda: el plan sólo guarda los orígenes, así
/// que su tamaño en memoria no depende de la cantidad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlan {
  dir: PathBuf,
  sources: Vec<(PathBuf, OsString)>,
  quantity: u32,
}

impl CopyPlan {
  pub fn build(
    sources: &SearchResult,
    destination: &DestinationPath,
    quantity: Quantity,
  ) -> Result<Self, CoreError> {
    let sources = sources
      .iter()
      .map(|source| {
        let name = source
          .file_name()
          .ok_or_else(|| CoreError::Replication(format!("source has no file name: {}", source.display())))?;
        Ok((source.clone(), name.to_os_string()))
      })
      .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(Self { dir: destination.as_path().to_path_buf(), sources, quantity: quantity.get() })
  }

  /// Entradas en orden: por archivo origen, y dentro de cada uno `1..=N`.
  pub fn entries(&self) -> impl Iterator<Item = CopyEntry> + '_ {
    let n = self.quantity;
    self.sources.iter().flat_map(move |(source, name)| {
      (1..=n).map(move |i| CopyEntry { source: source.clone(), destination: self.destination_for(name, i) })
    })
  }

  fn destination_for(&self, name: &OsStr, ordinal: u32) -> PathBuf {
    if self.quantity == 1 {
      return self.dir.join(name);
    }
    let mut prefixed = OsString::from(format!("{ordinal}_"));
    prefixed.push(name);
    self.dir.join(prefixed)
  }

  /// Número total de copias: `archivos × cantidad`.
  pub fn len(&self) -> u64 {
    self.sources.len() as u64 * u64::from(self.quantity)
  }

  pub fn is_empty(&self) -> bool {
    self.sources.is_empty()
  }

  pub fn destinations(&self) -> impl Iterator<Item = PathBuf> + '_ {
    self.entries().map(|e| e.destination)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;
  use std::path::Path;

  fn sources(paths: &[&str]) -> SearchResult {
    paths.iter().map(PathBuf::from).collect()
  }

  #[test]
  fn quantity_one_keeps_original_names() {
    let dest = DestinationPath::new(Path::new("/out"), "Steel", "2");
    let plan = CopyPlan::build(&sources(&["/src/a.dxf", "/src/b.dwg"]), &dest, Quantity::ONE).unwrap();

    let names: Vec<_> = plan.destinations().collect();
    assert_eq!(names, vec![PathBuf::from("/out/Steel/2/a.dxf"), PathBuf::from("/out/Steel/2/b.dwg")]);
  }

  #[test]
  fn quantity_n_prefixes_every_source() {
    let dest = DestinationPath::new(Path::new("/out"), "Steel", "2");
    let q = Quantity::new(3).unwrap();
    let plan = CopyPlan::build(&sources(&["/src/a.dxf", "/other/a.dwg"]), &dest, q).unwrap();

    assert_eq!(plan.len(), 6);
    let entries: Vec<CopyEntry> = plan.entries().collect();
    assert_eq!(entries.len(), 6);
    assert_eq!(entries[0].destination, Path::new("/out/Steel/2/1_a.dxf"));
    assert_eq!(entries[2].destination, Path::new("/out/Steel/2/3_a.dxf"));
    assert_eq!(entries[3].destination, Path::new("/out/Steel/2/1_a.dwg"));
    assert_eq!(entries[3].source, Path::new("/other/a.dwg"));
  }

  #[test]
  fn large_quantities_never_collide() {
    let dest = DestinationPath::new(Path::new("/out"), "Steel", "2");
    let q = Quantity::new(50).unwrap();
    let plan = CopyPlan::build(&sources(&["/src/PART-001.dxf"]), &dest, q).unwrap();

    let unique: HashSet<_> = plan.destinations().collect();
    assert_eq!(unique.len(), 50);
    assert!(unique.contains(Path::new("/out/Steel/2/50_PART-001.dxf")));
  }

  #[test]
  fn huge_quantity_is_planned_without_materializing_entries() {
    let dest = DestinationPath::new(Path::new("/out"), "Steel", "2");
    let q = Quantity::parse("2000000000").unwrap().unwrap();
    let plan = CopyPlan::build(&sources(&["/src/a.dxf", "/src/a.dwg"]), &dest, q).unwrap();

    assert_eq!(plan.len(), 4_000_000_000);
    let first: Vec<PathBuf> = plan.destinations().take(2).collect();
    assert_eq!(first, vec![PathBuf::from("/out/Steel/2/1_a.dxf"), PathBuf::from("/out/Steel/2/2_a.dxf")]);
  }

  #[test]
  fn empty_search_gives_empty_plan() {
    let dest = DestinationPath::new(Path::new("/out"), "Steel", "2");
    let plan = CopyPlan::build(&SearchResult::default(), &dest, Quantity::ONE).unwrap();
    assert!(plan.is_empty());
  }
}
