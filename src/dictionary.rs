use crate::errors::{Result, StructureQueryError};
use crate::schema::molecule_dictionary;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

#[cfg(all(feature = "pg", not(test)))]
type DbConn = PgConnection;
#[cfg(any(test, not(feature = "pg")))]
type DbConn = SqliteConnection;
/// Diesel backend the dictionary queries are boxed for: Postgres in `pg`
/// builds, SQLite in tests and non-`pg` builds.
#[cfg(all(feature = "pg", not(test)))]
pub type Db = diesel::pg::Pg;
#[cfg(any(test, not(feature = "pg")))]
pub type Db = diesel::sqlite::Sqlite;
type DbPool = Pool<ConnectionManager<DbConn>>;

/// One molecule dictionary entry, keyed naturally by
/// (structure_type, structure_key, project).
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = molecule_dictionary)]
pub struct DictionaryRow {
  pub molregno: i64,
  pub structure_type: String,
  pub structure_key: String,
  pub project_id: i64,
  pub public: bool,
}

/// Rows carrying the natural key that are publicly visible, excluding the
/// given project. Returns a composable boxed query; nothing is executed.
pub fn by_natural_key_public_except_project(stype: &str,
                                            skey: &str,
                                            project: i64)
                                            -> molecule_dictionary::BoxedQuery<'static, Db> {
  use crate::schema::molecule_dictionary::dsl::*;
  molecule_dictionary.into_boxed()
                     .filter(structure_type.eq(stype.to_string()))
                     .filter(structure_key.eq(skey.to_string()))
                     .filter(public.eq(true))
                     .filter(project_id.ne(project))
}

/// Rows carrying the natural key, scoped exactly to the given project.
pub fn by_project_and_natural_key(stype: &str,
                                  skey: &str,
                                  project: i64)
                                  -> molecule_dictionary::BoxedQuery<'static, Db> {
  use crate::schema::molecule_dictionary::dsl::*;
  molecule_dictionary.into_boxed()
                     .filter(structure_type.eq(stype.to_string()))
                     .filter(structure_key.eq(skey.to_string()))
                     .filter(project_id.eq(project))
}

/// Diesel-backed repository over the molecule dictionary. Applies the
/// embedded migrations on construction.
pub struct DictionaryRepository {
  pool: Arc<DbPool>,
}

impl DictionaryRepository {
  pub fn new(database_url: &str) -> Result<Self> {
    let manager = ConnectionManager::<DbConn>::new(database_url);
    let pool = Pool::builder().max_size(4).build(manager)?;
    let repo = DictionaryRepository { pool: Arc::new(pool) };
    {
      let mut conn = repo.conn()?;
      #[cfg(any(test, not(feature = "pg")))]
      {
        let _ = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(&mut conn);
        let _ = diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(&mut conn);
      }
      conn.run_pending_migrations(MIGRATIONS)
          .map_err(|e| StructureQueryError::Database(format!("migrations: {}", e)))?;
    }
    Ok(repo)
  }

  fn conn(&self) -> Result<PooledConnection<ConnectionManager<DbConn>>> {
    Ok(self.pool.get()?)
  }

  pub fn insert(&self, row: &DictionaryRow) -> Result<()> {
    let mut conn = self.conn()?;
    diesel::insert_into(molecule_dictionary::table).values(row).execute(&mut conn)?;
    Ok(())
  }

  /// Execute [`by_natural_key_public_except_project`].
  pub fn public_except_project(&self, stype: &str, skey: &str, project: i64) -> Result<Vec<DictionaryRow>> {
    let mut conn = self.conn()?;
    let rows = by_natural_key_public_except_project(stype, skey, project).load::<DictionaryRow>(&mut conn)?;
    Ok(rows)
  }

  /// Execute [`by_project_and_natural_key`].
  pub fn for_project(&self, stype: &str, skey: &str, project: i64) -> Result<Vec<DictionaryRow>> {
    let mut conn = self.conn()?;
    let rows = by_project_and_natural_key(stype, skey, project).load::<DictionaryRow>(&mut conn)?;
    Ok(rows)
  }
}

/// Build the repository from `CHEM_DB_URL`, falling back to `DATABASE_URL`.
/// Without the `pg` feature (and in tests) the URL is handed to SQLite.
pub fn new_from_env() -> Result<DictionaryRepository> {
  dotenvy::dotenv().ok();
  let url = std::env::var("CHEM_DB_URL").or_else(|_| std::env::var("DATABASE_URL"))
                                        .map_err(|_| StructureQueryError::Database("CHEM_DB_URL / DATABASE_URL not set".into()))?;
  DictionaryRepository::new(&url)
}
