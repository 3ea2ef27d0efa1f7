//! Fuentes y sumideros de registros: CSV de entrada, informe de no encontrados
//! y resumen JSON de cada ejecución.

pub mod config;
pub mod csv_source;
pub mod error;
pub mod not_found;
pub mod summary;

pub use config::RecordsConfig;
pub use csv_source::{CsvLoad, CsvRecordSource, discover_csv_files, material_from_filename, read_csv_file};
pub use error::RecordsError;
pub use not_found::{parse_report, read_report, render_report, write_report};
pub use summary::{RunSummary, write_summary};
