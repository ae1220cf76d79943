use crate::errors::{Result, StructureQueryError};

/// Closed set of database dialects the structure-query layer knows how to
/// talk to. Anything else is rejected up front instead of silently falling
/// back to a generic implementation, because every operation here is a call
/// into a vendor-specific chemistry extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
  /// Oracle with the chemical cartridge (`molsim`, `sss`, `flexmatch`).
  Oracle,
  /// PostgreSQL with the RDKit extension (`mol`/`qmol` types, `@>`, `@=`,
  /// `tanimoto_sml`, torsion fingerprints).
  Postgresql,
}

impl SqlDialect {
  /// Resolve the dialect from the vendor identifier reported by the active
  /// connection. Unknown vendors fail loudly.
  pub fn for_vendor(vendor: &str) -> Result<Self> {
    match vendor {
      "oracle" => Ok(SqlDialect::Oracle),
      "postgresql" => Ok(SqlDialect::Postgresql),
      other => Err(StructureQueryError::UnsupportedBackend(other.to_string())),
    }
  }

  pub fn vendor(&self) -> &'static str {
    match self {
      SqlDialect::Oracle => "oracle",
      SqlDialect::Postgresql => "postgresql",
    }
  }
}
