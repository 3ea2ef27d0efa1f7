use std::path::{Path, PathBuf};

/// Valor sustituto cuando la normalización no deja nada utilizable.
pub const UNKNOWN_SENTINEL: &str = "unknown";

/// Ruta destino `<base>/<material>/<espesor-normalizado>`.
///
/// Dos pares (material, espesor) distintos sólo colisionan a través del
/// centinela `unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DestinationPath {
  material: String,
  thickness: String,
  path: PathBuf,
}

impl DestinationPath {
  pub fn new(base: &Path, material: &str, thickness: &str) -> Self {
    let material = sanitize_material(material);
    let thickness = normalize_thickness(thickness);
    let path = base.join(&material).join(&thickness);
    Self { material, thickness, path }
  }

  /// Segmento de material ya saneado.
  pub fn material(&self) -> &str {
    &self.material
  }

  /// Segmento de espesor ya normalizado.
  pub fn thickness(&self) -> &str {
    &self.thickness
  }

  pub fn as_path(&self) -> &Path {
    &self.path
  }

  pub fn into_path_buf(self) -> PathBuf {
    self.path
  }
}

impl AsRef<Path> for DestinationPath {
  fn as_ref(&self) -> &Path {
    &self.path
  }
}

/// Conserva dígitos ASCII y el primer punto decimal.
///
/// - `"1.5mm"` → `"1.5"`
/// - `"1.2.3"` → `"1.23"`
/// - `""`, `"abc"`, `"."` → `"unknown"`
pub fn normalize_thickness(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  let mut seen_dot = false;

  for c in raw.chars() {
    if c.is_ascii_digit() {
      out.push(c);
    } else if c == '.' && !seen_dot {
      seen_dot = true;
      out.push(c);
    }
  }

  if !out.bytes().any(|b| b.is_ascii_digit()) {
    return UNKNOWN_SENTINEL.to_string();
  }

  out
}

/// El material es un único segmento de ruta: nunca puede escapar de `base`.
pub fn sanitize_material(raw: &str) -> String {
  let trimmed = raw.trim();

  let cleaned: String =
    trimmed.chars().map(|c| if c == '/' || c == '\\' || c == '\0' { '-' } else { c }).collect();

  match cleaned.as_str() {
    "" | "." | ".." => UNKNOWN_SENTINEL.to_string(),
    _ => cleaned,
  }
}
