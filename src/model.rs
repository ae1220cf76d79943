use crate::errors::{Result, StructureQueryError};

/// Declared field on a model: the logical name used by application code and
/// the physical column it is stored in, when the two differ.
#[derive(Debug, Clone, Copy)]
pub struct FieldMeta {
  pub name: &'static str,
  pub db_column: Option<&'static str>,
}

/// Minimal model metadata: enough to resolve logical field names to the
/// physical columns raw SQL fragments must reference.
#[derive(Debug, Clone, Copy)]
pub struct ModelMeta {
  pub model: &'static str,
  pub db_table: &'static str,
  pub fields: &'static [FieldMeta],
}

impl ModelMeta {
  /// Physical column for a logical field: the declared `db_column` override
  /// if present, the logical name otherwise. An undeclared field is a
  /// programming error and fails immediately.
  pub fn column(&self, name: &str) -> Result<&'static str> {
    self.fields
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.db_column.unwrap_or(f.name))
        .ok_or_else(|| StructureQueryError::UnknownField { model: self.model, field: name.to_string() })
  }
}

/// Compound structure table: the `ctab` field holds the connection table
/// (stored in `molfile`), `molecule` is the registry-number foreign key.
pub const COMPOUND_MOLS: ModelMeta = ModelMeta { model: "CompoundMols",
                                                 db_table: "compound_mols",
                                                 fields: &[FieldMeta { name: "molecule",
                                                                       db_column: Some("molregno") },
                                                           FieldMeta { name: "ctab",
                                                                       db_column: Some("molfile") }] };
