use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Fila lógica tal como la entrega la fuente de registros.
///
/// Los campos llegan crudos (sin parsear) porque la validación pertenece al
/// orquestador: una fila con cantidad `"0"` o sin espesor no es un error de
/// lectura, es un registro que se salta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
  /// Etiqueta legible para diagnósticos, p.ej. `Steel.csv:row 14`.
  pub row: String,
  pub identifier: String,
  pub material: String,
  pub thickness: String,
  pub quantity: String,
}

impl Record {
  pub fn new(
    row: impl Into<String>,
    identifier: impl Into<String>,
    material: impl Into<String>,
    thickness: impl Into<String>,
    quantity: impl Into<String>,
  ) -> Self {
    Self {
      row: row.into(),
      identifier: identifier.into(),
      material: material.into(),
      thickness: thickness.into(),
      quantity: quantity.into(),
    }
  }

  /// Paso `Validate` de la máquina de estados.
  pub fn validate(&self) -> Result<ValidatedRecord, SkipReason> {
    let identifier = self.identifier.trim();
    if identifier.is_empty() {
      return Err(SkipReason::MissingIdentifier);
    }

    let thickness = self.thickness.trim();
    if thickness.is_empty() {
      return Err(SkipReason::MissingThickness);
    }

    let quantity = match Quantity::parse(&self.quantity)? {
      Some(q) => q,
      None => return Err(SkipReason::ZeroQuantity),
    };

    Ok(ValidatedRecord {
      row: self.row.clone(),
      identifier: identifier.to_string(),
      material: self.material.trim().to_string(),
      thickness: thickness.to_string(),
      quantity,
    })
  }
}

/// Registro que pasó la validación y puede entrar en `Locate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
  pub row: String,
  pub identifier: String,
  pub material: String,
  pub thickness: String,
  pub quantity: Quantity,
}

/// Motivo por el que un registro terminó en el estado "skipped".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
  MissingIdentifier,
  MissingThickness,
  InvalidQuantity(String),
  /// Cantidad < 1 tras truncar. Se trata igual que una cantidad inválida.
  ZeroQuantity,
}

impl fmt::Display for SkipReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SkipReason::MissingIdentifier => write!(f, "missing product identifier"),
      SkipReason::MissingThickness => write!(f, "missing thickness"),
      SkipReason::InvalidQuantity(raw) => write!(f, "invalid quantity '{raw}'"),
      SkipReason::ZeroQuantity => write!(f, "quantity < 1"),
    }
  }
}

/// Número de réplicas pedidas para un registro. Siempre >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(NonZeroU32);

impl Quantity {
  pub const ONE: Quantity = Quantity(NonZeroU32::MIN);

  pub fn new(value: u32) -> Option<Self> {
    NonZeroU32::new(value).map(Quantity)
  }

  pub fn get(self) -> u32 {
    self.0.get()
  }

  /// Parsea la cantidad cruda de una fila.
  ///
  /// - `""` → `Ok(None)` (equivale a 0)
  /// - `"2.0"`, `"2.9"` → 2 (trunca hacia cero)
  /// - `"-1"`, `"0.5"`, `"0"` → `Ok(None)`
  /// - `"abc"`, `"inf"`, valores que no caben en `u32` → `Err(InvalidQuantity)`
  pub fn parse(raw: &str) -> Result<Option<Self>, SkipReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Ok(None);
    }

    let invalid = || SkipReason::InvalidQuantity(trimmed.to_string());

    let value: f64 = trimmed.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
      return Err(invalid());
    }

    let truncated = value.trunc();
    if truncated < 1.0 {
      return Ok(None);
    }
    if truncated > u32::MAX as f64 {
      return Err(invalid());
    }

    Ok(Quantity::new(truncated as u32))
  }
}

impl fmt::Display for Quantity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}
