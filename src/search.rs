// Archivo: search.rs
// Propósito: el servicio de búsqueda estructural. Valida entradas, resuelve
// columnas físicas, despacha por dialecto y devuelve consultas aumentadas
// componibles. En el camino PostgreSQL también gestiona la configuración de
// sesión de RDKit con reset garantizado.
use crate::dialect::SqlDialect;
use crate::errors::{Result, StructureQueryError};
use crate::model::{ModelMeta, COMPOUND_MOLS};
use crate::query::QueryExtras;
use crate::session::StructureSession;
use crate::smarts::generalize_carbons;

/// Registers the RDKit `mol` type on the connection before the session
/// variable can be set.
pub const MOL_TYPE_BOOTSTRAP: &str = "select 'c1ccccc1O'::mol;";

/// Restores the extension's default similarity threshold.
pub const TANIMOTO_RESET: &str = "set rdkit.tanimoto_threshold=0.5;";

/// Parse a similarity index given as text, enforcing the same range as
/// [`CompoundStructureSearch::similar_to`]. Useful for callers that receive
/// the threshold from request parameters.
pub fn parse_similarity_index(raw: &str) -> Result<i32> {
  let sim: i32 = raw.trim().parse().map_err(|_| StructureQueryError::InvalidSimilarityIndex)?;
  if !(50..=100).contains(&sim) {
    return Err(StructureQueryError::InvalidSimilarityIndex);
  }
  Ok(sim)
}

/// Stateless strategy object for chemistry-aware searches over one compound
/// table. It owns no connection; every call is handed the session it should
/// run against, so the same instance serves any number of requests.
#[derive(Debug, Clone, Copy)]
pub struct CompoundStructureSearch {
  meta: &'static ModelMeta,
}

impl Default for CompoundStructureSearch {
  fn default() -> Self {
    Self::new(&COMPOUND_MOLS)
  }
}

impl CompoundStructureSearch {
  pub const fn new(meta: &'static ModelMeta) -> Self {
    Self { meta }
  }

  pub fn meta(&self) -> &'static ModelMeta {
    self.meta
  }

  /// Similarity search: rows whose structure scores at least
  /// `similarity_index` percent against `structure`, with the score exposed
  /// as a `similarity` column.
  ///
  /// The index must lie in [50, 100]; anything else fails before the
  /// session is touched. On PostgreSQL this registers the `mol` type,
  /// narrows `rdkit.tanimoto_threshold` for the duration of the returned
  /// query and restores it when the query is dropped, whatever exit path
  /// the caller takes.
  pub fn similar_to<'s, S: StructureSession>(&self,
                                             session: &'s mut S,
                                             structure: &str,
                                             similarity_index: i32)
                                             -> Result<StructureQuery<'s, S>> {
    if !(50..=100).contains(&similarity_index) {
      return Err(StructureQueryError::InvalidSimilarityIndex);
    }
    let ctab = self.meta.column("ctab")?;
    let molregno = self.meta.column("molecule")?;
    let dialect = SqlDialect::for_vendor(session.vendor())?;
    match dialect {
      SqlDialect::Oracle => {
        let extras =
          QueryExtras::new().select_extra("similarity", &format!("TO_NUMBER (molsim ({}, :structure, 'normal'))", ctab))
                            .and_where(&format!("molsim ({}, :structure, 'normal') BETWEEN {} AND '100'",
                                                ctab, similarity_index))
                            .bind("structure", &format!("smiles:{}", structure));
        Ok(StructureQuery::new(session, dialect, self.meta.db_table, extras, None))
      }
      SqlDialect::Postgresql => {
        let threshold = f64::from(similarity_index) / 100.0;
        session.batch_execute(MOL_TYPE_BOOTSTRAP)?;
        session.batch_execute(&format!("set rdkit.tanimoto_threshold={};", threshold))?;
        let extras =
          QueryExtras::new().select_extra("similarity", "tanimoto_sml(torsionbv_fp(:structure), torsionbv)")
                            .table("fps_rdkit")
                            .and_where(&format!("fps_rdkit.molregno = {}.{} and torsionbv_fp(:structure) % torsionbv \
                                                 and tanimoto_sml(torsionbv_fp(:structure), torsionbv) between {} and \
                                                 1.0",
                                                self.meta.db_table, molregno, threshold))
                            .order_by("similarity DESC")
                            .bind("structure", structure);
        Ok(StructureQuery::new(session, dialect, self.meta.db_table, extras, Some(TANIMOTO_RESET.to_string())))
      }
    }
  }

  /// Substructure search: rows whose structure contains `structure` as a
  /// literal fragment.
  pub fn with_substructure<'s, S: StructureSession>(&self,
                                                    session: &'s mut S,
                                                    structure: &str)
                                                    -> Result<StructureQuery<'s, S>> {
    let ctab = self.meta.column("ctab")?;
    let dialect = SqlDialect::for_vendor(session.vendor())?;
    let extras = match dialect {
      SqlDialect::Oracle => QueryExtras::new().and_where(&format!("(sss({}, :structure, 'ignore=all')=1)", ctab))
                                              .bind("structure", &format!("smiles:{}", structure)),
      SqlDialect::Postgresql => {
        QueryExtras::new().and_where(&format!("{}@>:structure", ctab)).bind("structure", structure)
      }
    };
    Ok(StructureQuery::new(session, dialect, self.meta.db_table, extras, None))
  }

  /// Substructure search with carbon generalization: the pattern's bare
  /// aliphatic carbons are rewritten to `[#6]` and, on PostgreSQL, matched
  /// as a `qmol` query template. The Oracle cartridge has no query-molecule
  /// type, so there the raw pattern is matched as in
  /// [`Self::with_substructure`].
  pub fn with_substructure_pattern<'s, S: StructureSession>(&self,
                                                            session: &'s mut S,
                                                            structure: &str)
                                                            -> Result<StructureQuery<'s, S>> {
    let ctab = self.meta.column("ctab")?;
    let dialect = SqlDialect::for_vendor(session.vendor())?;
    let extras = match dialect {
      SqlDialect::Oracle => QueryExtras::new().and_where(&format!("(sss({}, :structure, 'ignore=all')=1)", ctab))
                                              .bind("structure", &format!("smiles:{}", structure)),
      SqlDialect::Postgresql => {
        QueryExtras::new().and_where(&format!("{}@>:pattern::qmol", ctab))
                          .bind("pattern", &generalize_carbons(structure))
      }
    };
    Ok(StructureQuery::new(session, dialect, self.meta.db_table, extras, None))
  }

  /// Exact match ignoring stereochemistry and isotopes.
  pub fn flexmatch<'s, S: StructureSession>(&self, session: &'s mut S, structure: &str) -> Result<StructureQuery<'s, S>> {
    let ctab = self.meta.column("ctab")?;
    let dialect = SqlDialect::for_vendor(session.vendor())?;
    let extras = match dialect {
      SqlDialect::Oracle => QueryExtras::new().and_where(&format!("(flexmatch({}, :structure, 'ignore=all')=1)", ctab))
                                              .bind("structure", &format!("smiles:{}", structure)),
      SqlDialect::Postgresql => {
        QueryExtras::new().and_where(&format!("{}@=:structure", ctab)).bind("structure", structure)
      }
    };
    Ok(StructureQuery::new(session, dialect, self.meta.db_table, extras, None))
  }
}

/// An augmented select bound to the session it was built for. Nothing runs
/// until [`StructureQuery::load`]; further raw fragments can still be
/// attached before that.
///
/// When the similarity path narrowed the RDKit session threshold, the reset
/// statement is held here and issued on drop, so the narrowed value cannot
/// leak into unrelated statements on the connection even if the caller
/// bails out early or `load` fails.
pub struct StructureQuery<'s, S: StructureSession> {
  session: &'s mut S,
  dialect: SqlDialect,
  table: &'static str,
  extras: QueryExtras,
  reset: Option<String>,
}

impl<'s, S: StructureSession> StructureQuery<'s, S> {
  pub(crate) fn new(session: &'s mut S,
                    dialect: SqlDialect,
                    table: &'static str,
                    extras: QueryExtras,
                    reset: Option<String>)
                    -> Self {
    Self { session, dialect, table, extras, reset }
  }

  pub fn dialect(&self) -> SqlDialect {
    self.dialect
  }

  /// Attach one more raw WHERE fragment (joined with ` and `).
  pub fn and_where(mut self, fragment: &str) -> Self {
    self.extras = std::mem::take(&mut self.extras).and_where(fragment);
    self
  }

  /// Bind one more named placeholder value.
  pub fn bind(mut self, name: &str, value: &str) -> Self {
    self.extras = std::mem::take(&mut self.extras).bind(name, value);
    self
  }

  /// Render without executing: the statement plus the parameter values in
  /// driver order.
  pub fn to_sql(&self) -> (String, Vec<String>) {
    self.extras.render(self.dialect, self.table)
  }

  /// Execute the augmented select through the owning session.
  pub fn load(&mut self) -> Result<Vec<S::Row>> {
    let (sql, params) = self.extras.render(self.dialect, self.table);
    let refs: Vec<&str> = params.iter().map(String::as_str).collect();
    self.session.query(&sql, &refs)
  }
}

impl<S: StructureSession> Drop for StructureQuery<'_, S> {
  fn drop(&mut self) {
    if let Some(reset) = self.reset.take() {
      if let Err(e) = self.session.batch_execute(&reset) {
        log::warn!("failed to restore rdkit.tanimoto_threshold: {}", e);
      }
    }
  }
}
