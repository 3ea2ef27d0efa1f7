// crates/kerf-core/src/errors.rs
use thiserror::Error;

/// Error genérico del núcleo de kerf.
///
/// Las capas superiores (CLI, adapters) lo mapean a mensajes de usuario o logs.
/// Ninguna variante aborta un batch: el servicio las convierte en desenlaces
/// por registro.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("destination error: {0}")]
  Destination(String),

  #[error("replication error: {0}")]
  Replication(String),
}
