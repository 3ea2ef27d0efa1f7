use crate::paths::{ConfigError, KerfPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// toml_edit para escritura preservando comentarios
use toml_edit::{DocumentMut, Item};

pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

pub struct TomlConfigBackend {
  path: PathBuf,
}

impl TomlConfigBackend {
  pub fn new(paths: &KerfPaths) -> Self {
    Self { path: paths.config_file() }
  }

  /// Backend sobre un archivo concreto (tests, `--config`).
  pub fn at(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Como `load_section`, pero si falta el archivo o la sección devuelve
  /// `T::default()`. Los campos ausentes dentro de la sección los rellena serde.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let content = match fs::read_to_string(&self.path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        return Ok(T::default());
      }
      Err(e) => return Err(e.into()),
    };

    let toml_val: toml::Value = toml::from_str(&content)?;

    let Some(table) = toml_val.get(section) else {
      return Ok(T::default());
    };

    let t: T = table
      .clone()
      .try_into()
      .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))?;

    Ok(t)
  }
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let content = fs::read_to_string(&self.path)?;
    let toml_val: toml::Value = toml::from_str(&content)?;

    let table = toml_val
      .get(section)
      .ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {:?}", self.path)))?;

    let t: T = table
      .clone()
      .try_into()
      .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))?;

    Ok(t)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    // 1) Leer config actual como DocumentMut o crear doc vacío si no existe.
    let mut doc: DocumentMut = match fs::read_to_string(&self.path) {
      Ok(content) => content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?,
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // 2) Serializar la sección con `toml` (serde) y volver a parsearla como
    //    tabla de toml_edit.
    let section_str = toml::to_string(value)
      .map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    let mut section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();

    // Los comentarios encima de la cabecera `[section]` viven en su decor.
    if let (Some(old), Some(new)) = (doc.get(section).and_then(Item::as_table), section_item.as_table_mut()) {
      *new.decor_mut() = old.decor().clone();
    }

    // 3) Reemplazar sólo esa sección; el resto del documento (y sus
    //    comentarios) queda igual.
    doc[section] = section_item;

    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }

    kerf_fs::atomic_write_str(&self.path, &doc.to_string())?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;
  use tempfile::tempdir;

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  struct Sample {
    #[serde(default)]
    roots: Vec<String>,
    #[serde(default = "default_depth")]
    max_depth: usize,
  }

  fn default_depth() -> usize {
    7
  }

  impl Default for Sample {
    fn default() -> Self {
      Sample { roots: Vec::new(), max_depth: default_depth() }
    }
  }

  #[test]
  fn missing_file_gives_default() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::at(tmp.path().join("kerf.toml"));

    let s: Sample = backend.load_section_with_default("locator").unwrap();
    assert_eq!(s, Sample::default());
    assert!(backend.load_section::<Sample>("locator").is_err());
  }

  #[test]
  fn partial_section_fills_serde_defaults() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("kerf.toml");
    fs::write(&path, "[locator]\nroots = [\"/mnt/cad\"]\n").unwrap();

    let s: Sample = TomlConfigBackend::at(&path).load_section_with_default("locator").unwrap();
    assert_eq!(s.roots, vec!["/mnt/cad".to_string()]);
    assert_eq!(s.max_depth, 7);
  }

  #[test]
  fn save_keeps_other_sections_and_comments() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("kerf.toml");
    fs::write(&path, "# hand written\n[output]\ndestination = \"/srv/out\" # keep me\n\n# search roots\n[locator]\nroots = []\n").unwrap();

    let backend = TomlConfigBackend::at(&path);
    let s = Sample { roots: vec!["/a".into(), "/b".into()], max_depth: 3 };
    backend.save_section("locator", &s).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("# hand written"));
    assert!(text.contains("# keep me"));
    assert!(text.contains("# search roots"));

    let loaded: Sample = backend.load_section("locator").unwrap();
    assert_eq!(loaded, s);
  }
}
