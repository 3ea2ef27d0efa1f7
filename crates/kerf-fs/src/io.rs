use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use filetime::FileTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
  #[error("io error: {0}")]
  Io(#[from] io::Error),

  #[error("not a directory: {0}")]
  NotADirectory(PathBuf),
}

pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  let tmp_path = path.with_extension("tmp");

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  Ok(())
}

/// Intentos de sufijo antes de rendirse en [`create_unique`].
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Reserva `<dir>/<stem>.<ext>` con `create_new`; si ya existe prueba
/// `<stem>_1.<ext>`, `<stem>_2.<ext>`... Nunca pisa un archivo existente.
pub fn create_unique(dir: &Path, stem: &str, ext: &str) -> io::Result<(PathBuf, fs::File)> {
  for n in 0..MAX_NAME_ATTEMPTS {
    let name = if n == 0 { format!("{stem}.{ext}") } else { format!("{stem}_{n}.{ext}") };
    let path = dir.join(name);

    match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
      Ok(file) => return Ok((path, file)),
      Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
      Err(e) => return Err(e),
    }
  }

  Err(io::Error::new(io::ErrorKind::AlreadyExists, format!("no free name for {stem}.{ext} in {}", dir.display())))
}

/// Creación recursiva e idempotente: si ya existe como directorio, no hace nada.
pub fn ensure_dir(dir: &Path) -> Result<(), FsError> {
  match fs::metadata(dir) {
    Ok(m) if m.is_dir() => return Ok(()),
    Ok(_) => return Err(FsError::NotADirectory(dir.to_path_buf())),
    Err(_) => {}
  }

  fs::create_dir_all(dir)?;
  Ok(())
}

/// Copia byte a byte (y permisos, vía `fs::copy`) y, si se pide, conserva las
/// fechas de modificación y acceso del origen.
pub fn copy_preserving(src: &Path, dst: &Path, preserve_times: bool) -> io::Result<u64> {
  let bytes = fs::copy(src, dst)?;

  if preserve_times {
    let meta = fs::metadata(src)?;
    let mtime = FileTime::from_last_modification_time(&meta);
    let atime = FileTime::from_last_access_time(&meta);
    filetime::set_file_times(dst, atime, mtime)?;
  }

  Ok(bytes)
}
