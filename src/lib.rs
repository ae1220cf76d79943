//! Chemistry-aware structure queries over relational stores.
//!
//! La parte quimioinformática (huellas, similitud Tanimoto, subestructura)
//! vive en las extensiones de la base de datos: el cartucho químico de
//! Oracle y la extensión RDKit de PostgreSQL. Este crate aporta el despacho
//! por dialecto, el ensamblado de fragmentos SQL, la validación de entradas
//! y la configuración de sesión de RDKit con reset garantizado, además de
//! los helpers de clave natural sobre el diccionario de moléculas.

mod dialect;
mod dictionary;
mod errors;
mod model;
mod query;
pub mod schema;
mod search;
mod session;
mod smarts;
pub mod stubs;

pub use dialect::SqlDialect;
pub use dictionary::{by_natural_key_public_except_project, by_project_and_natural_key, new_from_env, Db,
                     DictionaryRepository, DictionaryRow};
pub use errors::{Result, StructureQueryError};
pub use model::{FieldMeta, ModelMeta, COMPOUND_MOLS};
pub use query::QueryExtras;
pub use search::{parse_similarity_index, CompoundStructureSearch, StructureQuery, MOL_TYPE_BOOTSTRAP, TANIMOTO_RESET};
pub use session::StructureSession;
#[cfg(feature = "pg")]
pub use session::PgStructureSession;
pub use smarts::generalize_carbons;
