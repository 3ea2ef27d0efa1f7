use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use kerf_core::domain::NotFoundEntry;
use kerf_fs::{atomic_write_str, create_unique};
use regex::Regex;
use tracing::info;

use crate::error::RecordsError;

const ENTRY_PATTERN: &str =
  r"Product Name:[ \t]*(.+?)\s+Material:[ \t]*(.*?)\s+Thickness:[ \t]*(.+?)\s+Quantity:[ \t]*(\d+)";

/// Texto del informe: cabecera `#` y un bloque por entrada separados por línea en blanco.
pub fn render_report(entries: &[NotFoundEntry], generated_at: u64) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "# kerf not-found report");
  let _ = writeln!(out, "# generated: {generated_at}");
  let _ = writeln!(out, "# entries: {}", entries.len());

  for e in entries {
    out.push('\n');
    let _ = writeln!(out, "Product Name: {}", e.identifier);
    let _ = writeln!(out, "Material: {}", e.material);
    let _ = writeln!(out, "Thickness: {}", e.thickness);
    let _ = writeln!(out, "Quantity: {}", e.quantity);
  }

  out
}

/// Escribe `not_found_<unix>.txt` en `dir` (con sufijo `_<n>` si el nombre ya
/// está usado) y devuelve la ruta.
pub fn write_report(dir: &Path, entries: &[NotFoundEntry], generated_at: u64) -> Result<PathBuf, RecordsError> {
  fs::create_dir_all(dir).map_err(|e| RecordsError::io(dir, e))?;

  let (path, _) =
    create_unique(dir, &format!("not_found_{generated_at}"), "txt").map_err(|e| RecordsError::io(dir, e))?;
  atomic_write_str(&path, &render_report(entries, generated_at)).map_err(|e| RecordsError::io(&path, e))?;

  info!(path = %path.display(), "not-found report written ({} entries)", entries.len());
  Ok(path)
}

/// Extrae las entradas de un informe. Lo que no encaja con el patrón se ignora.
///
/// `label` se usa para la etiqueta de fila (`<label>:entry <n>`).
pub fn parse_report(text: &str, label: &str) -> Result<Vec<NotFoundEntry>, RecordsError> {
  let re = Regex::new(ENTRY_PATTERN)?;

  let entries = re
    .captures_iter(text)
    .filter_map(|caps| {
      // Una cantidad que no cabe en u32 no es recuperable.
      let quantity = caps[4].parse::<u32>().ok()?;
      Some((caps[1].trim().to_string(), caps[2].trim().to_string(), caps[3].trim().to_string(), quantity))
    })
    .enumerate()
    .map(|(i, (identifier, material, thickness, quantity))| NotFoundEntry {
      identifier,
      material,
      thickness,
      quantity,
      row: format!("{label}:entry {}", i + 1),
    })
    .collect();

  Ok(entries)
}

pub fn read_report(path: &Path) -> Result<Vec<NotFoundEntry>, RecordsError> {
  let bytes = fs::read(path).map_err(|e| RecordsError::io(path, e))?;
  let text = String::from_utf8_lossy(&bytes);
  let label = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

  parse_report(&text, &label)
}
