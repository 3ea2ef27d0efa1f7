use std::collections::{HashSet, VecDeque};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

// =============================================================================
// 1. Identificadores de Directorio (Platform Specific)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FileId(u64, u64);

#[cfg(unix)]
fn get_file_id(meta: &fs::Metadata) -> Option<FileId> {
  use std::os::unix::fs::MetadataExt;
  Some(FileId(meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
fn get_file_id(_meta: &fs::Metadata) -> Option<FileId> {
  // Sin inodos estables no deduplicamos; los topes de profundidad y de
  // directorios visitados siguen acotando el recorrido.
  None
}

// =============================================================================
// 2. Configuración y Tipos
// =============================================================================

/// Topes duros del recorrido. Funcionan como timeout implícito.
#[derive(Debug, Clone)]
pub struct WalkLimits {
  /// La raíz es profundidad 0; nunca se visita un directorio más profundo.
  pub max_depth: usize,
  /// Máximo de directorios visitados (leídos) por recorrido, raíz incluida.
  pub max_dirs: usize,
  pub follow_symlinks: bool,
  /// Evita visitar dos veces el mismo directorio (mismo dev/inode), p.ej.
  /// montajes o symlinks que forman ciclos.
  pub dedup_dirs: bool,
}

impl Default for WalkLimits {
  fn default() -> Self {
    Self { max_depth: 7, max_dirs: 300, follow_symlinks: false, dedup_dirs: true }
  }
}

/// Lo que el visitante decide tras ver un directorio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
  Continue,
  /// Corta el recorrido aunque queden directorios en la cola.
  Stop,
}

/// Un directorio visitado, con sus archivos ya ordenados por nombre.
#[derive(Debug)]
pub struct DirVisit<'a> {
  pub path: &'a Path,
  pub depth: usize,
  pub files: &'a [PathBuf],
}

/// Contenido de un directorio separado en archivos y subdirectorios.
#[derive(Debug, Default)]
pub struct Listing {
  pub files: Vec<PathBuf>,
  pub dirs: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct WalkSummary {
  pub dirs_visited: usize,
  /// Directorios que no se pudieron leer (se saltan, el recorrido sigue).
  pub errors: usize,
  /// El visitante devolvió [`Flow::Stop`].
  pub short_circuited: bool,
  /// Se alcanzó `max_dirs` con trabajo pendiente.
  pub truncated: bool,
  /// La raíz misma no se pudo leer.
  pub root_error: Option<io::Error>,
}

// =============================================================================
// 3. Listado de un Directorio
// =============================================================================

/// Lee un directorio y devuelve archivos y subdirectorios ordenados por nombre,
/// para que el resultado no dependa del orden que devuelva el sistema.
///
/// Las entradas individuales que fallan se ignoran.
pub fn list_dir(dir: &Path, follow_symlinks: bool) -> io::Result<Listing> {
  let mut listing = Listing::default();

  for entry in fs::read_dir(dir)? {
    let entry = match entry {
      Ok(e) => e,
      Err(e) => {
        debug!(dir = %dir.display(), "skipping unreadable entry: {e}");
        continue;
      }
    };

    // Tipo vía lstat: un symlink es symlink.
    let ft = match entry.file_type() {
      Ok(ft) => ft,
      Err(e) => {
        debug!(path = %entry.path().display(), "file type error: {e}");
        continue;
      }
    };

    let path = entry.path();

    if ft.is_dir() {
      listing.dirs.push(path);
    } else if ft.is_file() {
      listing.files.push(path);
    } else if ft.is_symlink() {
      // Un symlink a archivo cuenta como archivo; a directorio sólo si se
      // siguen symlinks.
      match fs::metadata(&path) {
        Ok(m) if m.is_file() => listing.files.push(path),
        Ok(m) if m.is_dir() && follow_symlinks => listing.dirs.push(path),
        _ => {}
      }
    }
  }

  listing.files.sort();
  listing.dirs.sort();
  Ok(listing)
}

// =============================================================================
// 4. Recorrido en Anchura Acotado
// =============================================================================

/// Recorre el árbol bajo `root` nivel por nivel con una cola explícita de
/// `(directorio, profundidad)`.
///
/// - Nunca visita más de `max_dirs` directorios ni baja de `max_depth`.
/// - Un directorio ilegible se cuenta como error y se salta.
/// - Si `visit` devuelve [`Flow::Stop`] el recorrido termina en el acto.
///
/// La cola nunca guarda más entradas de las que aún se pueden visitar, así que
/// la memoria queda acotada por `max_dirs` aunque el árbol sea enorme.
pub fn walk_bounded<F>(root: &Path, limits: &WalkLimits, mut visit: F) -> WalkSummary
where
  F: FnMut(&DirVisit<'_>) -> Flow,
{
  let mut summary = WalkSummary::default();
  if limits.max_dirs == 0 {
    summary.truncated = true;
    return summary;
  }

  let mut seen: HashSet<FileId> = HashSet::new();
  if limits.dedup_dirs {
    match fs::metadata(root) {
      Ok(m) => {
        if let Some(id) = get_file_id(&m) {
          seen.insert(id);
        }
      }
      Err(e) => {
        summary.root_error = Some(e);
        return summary;
      }
    }
  }

  let mut queue: VecDeque<(PathBuf, usize)> = VecDeque::new();
  queue.push_back((root.to_path_buf(), 0));

  while let Some((dir, depth)) = queue.pop_front() {
    summary.dirs_visited += 1;

    let listing = match list_dir(&dir, limits.follow_symlinks) {
      Ok(l) => l,
      Err(e) => {
        if depth == 0 {
          summary.root_error = Some(e);
          return summary;
        }
        // Permiso denegado, error transitorio de red... seguimos con la cola.
        debug!(dir = %dir.display(), "cannot read directory: {e}");
        summary.errors += 1;
        continue;
      }
    };

    let flow = visit(&DirVisit { path: &dir, depth, files: &listing.files });
    if flow == Flow::Stop {
      summary.short_circuited = true;
      return summary;
    }

    if depth >= limits.max_depth {
      continue;
    }

    for sub in listing.dirs {
      // Lo que ya está en cola se visitará seguro: no encolamos más de lo que
      // el tope permite.
      if summary.dirs_visited + queue.len() >= limits.max_dirs {
        summary.truncated = true;
        break;
      }

      if limits.dedup_dirs {
        match fs::metadata(&sub) {
          Ok(m) => {
            if let Some(id) = get_file_id(&m) {
              if !seen.insert(id) {
                debug!(dir = %sub.display(), "already visited, skipping");
                continue;
              }
            }
          }
          Err(e) => {
            debug!(dir = %sub.display(), "metadata error: {e}");
            summary.errors += 1;
            continue;
          }
        }
      }

      queue.push_back((sub, depth + 1));
    }
  }

  summary
}
