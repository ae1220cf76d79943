// Archivo: stubs.rs
// Propósito: implementaciones en memoria para pruebas y wiring rápido.
//
// `RecordingSession` registra cada sentencia en el orden en que la capa de
// consultas la emitiría contra una conexión real. No es durable; se usa en
// demos y tests.
use crate::errors::{Result, StructureQueryError};
use crate::session::StructureSession;

/// One statement as issued through a [`StructureSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuedStatement {
  /// Raw out-of-band statement (`batch_execute`).
  Batch(String),
  /// The augmented select with its bound parameter values.
  Query { sql: String, params: Vec<String> },
}

/// In-memory session that records everything instead of talking to a
/// database. The vendor string is arbitrary, so unsupported-backend paths
/// can be exercised too.
#[derive(Debug)]
pub struct RecordingSession {
  vendor: String,
  pub issued: Vec<IssuedStatement>,
  /// When set, `query` records the statement and then fails, to exercise
  /// error exit paths.
  pub fail_queries: bool,
}

impl RecordingSession {
  pub fn new(vendor: &str) -> Self {
    Self { vendor: vendor.to_string(), issued: Vec::new(), fail_queries: false }
  }

  pub fn failing(vendor: &str) -> Self {
    Self { fail_queries: true, ..Self::new(vendor) }
  }
}

impl StructureSession for RecordingSession {
  type Row = ();

  fn vendor(&self) -> &str {
    &self.vendor
  }

  fn batch_execute(&mut self, sql: &str) -> Result<()> {
    self.issued.push(IssuedStatement::Batch(sql.to_string()));
    Ok(())
  }

  fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<()>> {
    self.issued.push(IssuedStatement::Query { sql: sql.to_string(),
                                              params: params.iter().map(|p| p.to_string()).collect() });
    if self.fail_queries {
      return Err(StructureQueryError::Database("stub: query failure requested".into()));
    }
    Ok(Vec::new())
  }
}
