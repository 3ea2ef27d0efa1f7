use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use kerf_core::domain::Record;
use kerf_fs::list_dir;
use tracing::{debug, error, info};

use crate::error::RecordsError;

/// Bytes del principio del archivo que se miran para adivinar el separador.
const SNIFF_BYTES: usize = 1024;
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

const IDENTIFIER_COLUMNS: &[&str] = &["productname", "product", "partname", "part", "identifier"];
const THICKNESS_COLUMNS: &[&str] = &["thicknessmm", "thickness"];
const QUANTITY_COLUMNS: &[&str] = &["quantity", "qty"];
const MATERIAL_COLUMNS: &[&str] = &["material"];

/// Todos los registros leídos de un directorio de CSV.
#[derive(Debug, Default)]
pub struct CsvLoad {
  pub records: Vec<Record>,
  /// Archivos que no se pudieron leer; cada uno cuenta como un error del run.
  pub failed_files: u64,
}

/// Directorio de CSV, uno por material, procesados en orden de nombre.
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
  files: Vec<PathBuf>,
  material_prefix: String,
}

impl CsvRecordSource {
  pub fn from_dir(dir: &Path, material_prefix: impl Into<String>) -> Result<Self, RecordsError> {
    let files = discover_csv_files(dir)?;
    Ok(Self { files, material_prefix: material_prefix.into() })
  }

  pub fn files(&self) -> &[PathBuf] {
    &self.files
  }

  pub fn load(&self) -> CsvLoad {
    let mut load = CsvLoad::default();

    for file in &self.files {
      match read_csv_file(file, &self.material_prefix) {
        Ok(records) => {
          info!(file = %file.display(), "{} record(s) read", records.len());
          load.records.extend(records);
        }
        Err(e) => {
          error!("skipping csv file: {e}");
          load.failed_files += 1;
        }
      }
    }

    load
  }
}

/// Archivos `*.csv` (extensión sin distinguir mayúsculas) del directorio, ordenados.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>, RecordsError> {
  let meta = fs::metadata(dir).map_err(|e| RecordsError::io(dir, e))?;
  if !meta.is_dir() {
    return Err(RecordsError::NotADirectory(dir.to_path_buf()));
  }

  let listing = list_dir(dir, true).map_err(|e| RecordsError::io(dir, e))?;
  Ok(listing.files.into_iter().filter(|f| is_csv(f)).collect())
}

fn is_csv(path: &Path) -> bool {
  path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// `"Copy of THICKNESS AND MATERIAL DATA - Steel.csv"` → `"Steel"`.
pub fn material_from_filename(path: &Path, prefix: &str) -> String {
  let name = if is_csv(path) { path.file_stem() } else { path.file_name() };
  let name = name.map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

  let name = name.strip_prefix(prefix).unwrap_or(&name);
  name.trim().to_string()
}

pub fn read_csv_file(path: &Path, material_prefix: &str) -> Result<Vec<Record>, RecordsError> {
  let bytes = fs::read(path).map_err(|e| RecordsError::io(path, e))?;
  let text = String::from_utf8_lossy(&bytes);
  let material = material_from_filename(path, material_prefix);

  parse_records(path, &text, &material)
}

fn parse_records(path: &Path, text: &str, material: &str) -> Result<Vec<Record>, RecordsError> {
  let delimiter = sniff_delimiter(text);
  debug!(file = %path.display(), "delimiter {:?}", delimiter as char);

  let mut reader =
    ReaderBuilder::new().delimiter(delimiter).has_headers(false).flexible(true).from_reader(text.as_bytes());

  let to_error = |source: csv::Error| RecordsError::Csv { path: path.to_path_buf(), source };
  let mut rows = reader.records();

  let Some(header) = rows.next() else {
    return Ok(Vec::new());
  };
  let headers: Vec<String> = header.map_err(to_error)?.iter().map(normalize_header).collect();
  let cols =
    Columns::resolve(&headers).ok_or_else(|| RecordsError::MissingIdentifierColumn { path: path.to_path_buf() })?;

  let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
  let mut records = Vec::new();

  // La cabecera es la fila 1.
  for (index, row) in rows.enumerate() {
    let row = row.map_err(to_error)?;
    if row.iter().all(|cell| cell.trim().is_empty()) {
      continue;
    }

    let cell = |i: Option<usize>| i.and_then(|i| row.get(i)).unwrap_or("").trim();

    let identifier = cell(Some(cols.identifier));
    if identifier.is_empty() {
      continue;
    }

    let row_material = match cell(cols.material) {
      "" => material,
      m => m,
    };

    records.push(Record::new(
      format!("{file_name}:row {}", index + 2),
      identifier,
      row_material,
      cell(cols.thickness),
      cell(cols.quantity),
    ));
  }

  Ok(records)
}

struct Columns {
  identifier: usize,
  thickness: Option<usize>,
  quantity: Option<usize>,
  material: Option<usize>,
}

impl Columns {
  fn resolve(headers: &[String]) -> Option<Self> {
    let find = |aliases: &[&str]| aliases.iter().find_map(|a| headers.iter().position(|h| h == a));

    Some(Columns {
      identifier: find(IDENTIFIER_COLUMNS)?,
      thickness: find(THICKNESS_COLUMNS),
      quantity: find(QUANTITY_COLUMNS),
      material: find(MATERIAL_COLUMNS),
    })
  }
}

/// `" Thickness (mm) "` → `"thicknessmm"`.
fn normalize_header(raw: &str) -> String {
  raw.trim().chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect()
}

/// Elige el separador que más aparece en la cabecera y aparece igual número de
/// veces en las líneas siguientes de la muestra. Si ninguno es consistente, el
/// más frecuente en la cabecera; si no hay ninguno, `,`.
fn sniff_delimiter(text: &str) -> u8 {
  let mut end = text.len().min(SNIFF_BYTES);
  while !text.is_char_boundary(end) {
    end -= 1;
  }
  let sample = &text[..end];

  let mut lines = sample.lines();
  let Some(header) = lines.next() else {
    return b',';
  };

  let mut rest: Vec<&str> = lines.filter(|l| !l.trim().is_empty()).collect();
  // La última línea puede estar cortada por el tamaño de la muestra.
  if end < text.len() {
    rest.pop();
  }

  let count = |line: &str, d: u8| line.bytes().filter(|b| *b == d).count();

  let mut consistent: Option<(u8, usize)> = None;
  let mut frequent: Option<(u8, usize)> = None;

  for d in DELIMITERS {
    let n = count(header, d);
    if n == 0 {
      continue;
    }
    if frequent.is_none_or(|(_, best)| n > best) {
      frequent = Some((d, n));
    }
    if rest.iter().all(|l| count(l, d) == n) && consistent.is_none_or(|(_, best)| n > best) {
      consistent = Some((d, n));
    }
  }

  consistent.or(frequent).map(|(d, _)| d).unwrap_or(b',')
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn material_comes_from_file_name() {
    let prefix = "Copy of THICKNESS AND MATERIAL DATA - ";
    assert_eq!(material_from_filename(Path::new("/in/Copy of THICKNESS AND MATERIAL DATA - Steel.csv"), prefix), "Steel");
    assert_eq!(material_from_filename(Path::new("/in/ Aluminium 5754 .CSV"), prefix), "Aluminium 5754");
  }

  #[test]
  fn header_names_are_normalized() {
    assert_eq!(normalize_header(" Thickness (mm) "), "thicknessmm");
    assert_eq!(normalize_header("Product Name"), "productname");
    assert_eq!(normalize_header("\u{feff}QTY"), "qty");
  }

  #[test]
  fn sniffs_semicolon_and_tab() {
    assert_eq!(sniff_delimiter("Product Name;Thickness(mm);Quantity\nA,1;2,5;3\n"), b';');
    assert_eq!(sniff_delimiter("part\tqty\nA\t1\n"), b'\t');
    assert_eq!(sniff_delimiter("part\n"), b',');
  }

  #[test]
  fn parses_semicolon_file_with_thickness_mm_header() {
    let text = "Product Name;Thickness(mm);Quantity\nPART-001;2mm;3\n;;\n;1.5;2\nPART-002;1.5;\n";
    let records = parse_records(Path::new("/in/Steel.csv"), text, "Steel").unwrap();

    assert_eq!(
      records,
      vec![
        Record::new("Steel.csv:row 2", "PART-001", "Steel", "2mm", "3"),
        Record::new("Steel.csv:row 5", "PART-002", "Steel", "1.5", ""),
      ]
    );
  }

  #[test]
  fn material_column_overrides_file_name() {
    let text = "part,thickness,qty,material\nX-1,2,1,Inox\nX-2,2,1,\n";
    let records = parse_records(Path::new("Steel.csv"), text, "Steel").unwrap();

    assert_eq!(records[0].material, "Inox");
    assert_eq!(records[1].material, "Steel");
  }

  #[test]
  fn missing_identifier_column_is_an_error() {
    let err = parse_records(Path::new("x.csv"), "thickness,qty\n1,2\n", "x").unwrap_err();
    assert!(matches!(err, RecordsError::MissingIdentifierColumn { .. }));
  }

  #[test]
  fn loads_directory_in_name_order_and_counts_bad_files() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("b - Alu.csv"), "Product Name,Thickness,Quantity\nB-1,3,1\n").unwrap();
    fs::write(tmp.path().join("a - Steel.CSV"), "Product Name,Thickness,Quantity\nA-1,2,1\n").unwrap();
    fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();
    fs::write(tmp.path().join("c - Broken.csv"), "qty\n1\n").unwrap();

    let source = CsvRecordSource::from_dir(tmp.path(), "").unwrap();
    assert_eq!(source.files().len(), 3);

    let load = source.load();
    let ids: Vec<&str> = load.records.iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(ids, vec!["A-1", "B-1"]);
    assert_eq!(load.records[0].material, "a - Steel");
    assert_eq!(load.failed_files, 1);
  }

  #[test]
  fn invalid_utf8_is_replaced_not_fatal() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("Steel.csv");
    fs::write(&path, b"part,thickness,qty\nP\xff1,2,1\n").unwrap();

    let records = read_csv_file(&path, "").unwrap();
    assert_eq!(records[0].identifier, "P\u{fffd}1");
  }

  #[test]
  fn missing_directory_is_reported() {
    let tmp = tempdir().unwrap();
    assert!(CsvRecordSource::from_dir(&tmp.path().join("nope"), "").is_err());
  }
}
