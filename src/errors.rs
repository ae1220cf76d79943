// Archivo: errors.rs
// Propósito: definir los errores de la capa de consultas estructurales y el
// alias Result<T> usado por las APIs del crate.
use thiserror::Error;

/// Errores de la capa de consultas estructurales.
///
/// - `InvalidSimilarityIndex`: índice de similitud fuera de rango.
/// - `UnsupportedBackend`: el vendor de la base de datos no está soportado.
/// - `UnknownField`: campo lógico no declarado en el modelo (error de
///   programación, no de datos).
/// - `Database`: error del driver o del pool.
#[derive(Debug, Error)]
pub enum StructureQueryError {
  /// The similarity index did not parse as an integer, or fell outside the
  /// accepted range. Raised before any statement reaches the database.
  #[error("similarity_index must be integer from range (50,100)")]
  InvalidSimilarityIndex,
  /// The active connection reports a vendor other than the two supported
  /// ones. There is no generic fallback implementation.
  #[error("structure queries are not implemented for database vendor '{0}'")]
  UnsupportedBackend(String),
  /// A logical field name was requested that the model metadata does not
  /// declare. Treated as a programmer error and surfaced immediately.
  #[error("model '{model}' has no field named '{field}'")]
  UnknownField { model: &'static str, field: String },
  /// Driver, pool or migration failure, wrapped as text.
  #[error("database error: {0}")]
  Database(String),
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, StructureQueryError>;

impl From<r2d2::Error> for StructureQueryError {
  fn from(e: r2d2::Error) -> Self {
    Self::Database(format!("pool: {}", e))
  }
}

impl From<diesel::result::Error> for StructureQueryError {
  fn from(e: diesel::result::Error) -> Self {
    Self::Database(format!("db: {}", e))
  }
}

#[cfg(feature = "pg")]
impl From<postgres::Error> for StructureQueryError {
  fn from(e: postgres::Error) -> Self {
    Self::Database(format!("db: {}", e))
  }
}
