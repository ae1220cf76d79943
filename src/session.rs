use crate::errors::Result;

/// Connection surface the structure-query layer needs: the vendor identifier
/// for dialect dispatch, out-of-band statements (RDKit session setup and
/// reset), and execution of the augmented select itself.
///
/// The row type is whatever the underlying driver yields; stubs use `()`.
pub trait StructureSession {
  type Row;

  /// Vendor identifier of the active backend (`"oracle"`, `"postgresql"`,
  /// or anything else, in which case every operation fails).
  fn vendor(&self) -> &str;

  /// Issue a raw statement outside any query, e.g. `set rdkit...`.
  fn batch_execute(&mut self, sql: &str) -> Result<()>;

  /// Run a select with positionally bound text parameters.
  fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<Self::Row>>;
}

/// Session over a live PostgreSQL connection.
#[cfg(feature = "pg")]
pub struct PgStructureSession {
  client: postgres::Client,
}

#[cfg(feature = "pg")]
impl PgStructureSession {
  pub fn connect(database_url: &str) -> Result<Self> {
    let client = postgres::Client::connect(database_url, postgres::NoTls)?;
    Ok(Self { client })
  }

  /// Connect using `CHEM_DB_URL`, falling back to `DATABASE_URL` (mirrors
  /// the dictionary repository's `new_from_env`).
  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok();
    let url = std::env::var("CHEM_DB_URL").or_else(|_| std::env::var("DATABASE_URL"))
                                          .map_err(|_| {
                                            crate::errors::StructureQueryError::Database("CHEM_DB_URL / DATABASE_URL not \
                                                                                          set"
                                                                                               .into())
                                          })?;
    Self::connect(&url)
  }

  pub fn into_client(self) -> postgres::Client {
    self.client
  }
}

#[cfg(feature = "pg")]
impl StructureSession for PgStructureSession {
  type Row = postgres::Row;

  fn vendor(&self) -> &str {
    "postgresql"
  }

  fn batch_execute(&mut self, sql: &str) -> Result<()> {
    log::debug!("session statement: {}", sql);
    self.client.batch_execute(sql)?;
    Ok(())
  }

  fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<postgres::Row>> {
    use postgres::types::ToSql;
    let refs: Vec<&(dyn ToSql + Sync)> = params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
    let rows = self.client.query(sql, &refs)?;
    Ok(rows)
  }
}
