use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

/// Directorios de trabajo de kerf.
///
/// Con `KERF_BASE_DIR` todo cuelga de esa carpeta (modo portable); si no, se
/// usan los directorios estándar de la plataforma.
#[derive(Debug, Clone)]
pub struct KerfPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub logs_dir: PathBuf,
  pub reports_dir: PathBuf,
  config_file: Option<PathBuf>,
}

impl KerfPaths {
  pub fn new() -> Result<Self, ConfigError> {
    let (config_dir, data_dir, base_dir);

    if let Ok(env_base) = std::env::var("KERF_BASE_DIR") {
      let base = PathBuf::from(env_base);
      base_dir = base.clone();
      config_dir = base.join("config");
      data_dir = base.join("data");
    } else {
      let proj_dirs = ProjectDirs::from("com", "kerf", "kerf").ok_or(ConfigError::Directories)?;
      base_dir = proj_dirs.config_dir().to_path_buf();
      config_dir = proj_dirs.config_dir().to_path_buf();
      data_dir = proj_dirs.data_dir().to_path_buf();
    }

    let logs_dir = data_dir.join("logs");
    let reports_dir = data_dir.join("reports");

    std::fs::create_dir_all(&config_dir)?;
    std::fs::create_dir_all(&logs_dir)?;
    std::fs::create_dir_all(&reports_dir)?;

    Ok(Self { base_dir, config_dir, data_dir, logs_dir, reports_dir, config_file: None })
  }

  pub fn detect() -> Result<Self, ConfigError> {
    Self::new()
  }

  /// Usa un archivo de configuración explícito (`--config`) en vez del
  /// `kerf.toml` por defecto.
  pub fn with_config_file(mut self, file: impl Into<PathBuf>) -> Self {
    self.config_file = Some(file.into());
    self
  }

  pub fn config_file(&self) -> PathBuf {
    match &self.config_file {
      Some(f) => f.clone(),
      None => self.config_dir.join("kerf.toml"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  struct EnvVarGuard {
    key: String,
    original: Option<String>,
  }

  impl EnvVarGuard {
    fn new(key: &str, value: &str) -> Self {
      let original = std::env::var(key).ok();
      unsafe { std::env::set_var(key, value) };
      EnvVarGuard { key: key.to_owned(), original }
    }
  }

  impl Drop for EnvVarGuard {
    fn drop(&mut self) {
      match &self.original {
        Some(val) => unsafe { std::env::set_var(&self.key, val) },
        None => unsafe { std::env::remove_var(&self.key) },
      }
    }
  }

  #[test]
  fn test_kerf_base_dir_override() {
    let tmp = tempdir().unwrap();
    let _env = EnvVarGuard::new("KERF_BASE_DIR", tmp.path().to_str().unwrap());

    let paths = KerfPaths::new().unwrap();

    assert_eq!(paths.base_dir, tmp.path());
    assert_eq!(paths.config_dir, tmp.path().join("config"));
    assert_eq!(paths.logs_dir, tmp.path().join("data").join("logs"));
    assert_eq!(paths.reports_dir, tmp.path().join("data").join("reports"));
    assert_eq!(paths.config_file(), tmp.path().join("config").join("kerf.toml"));

    assert!(paths.config_dir.exists());
    assert!(paths.logs_dir.exists());
    assert!(paths.reports_dir.exists());

    let custom = paths.with_config_file(tmp.path().join("other.toml"));
    assert_eq!(custom.config_file(), tmp.path().join("other.toml"));
  }
}
