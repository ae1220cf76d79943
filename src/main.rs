use std::error::Error;

use chem_structure_query::stubs::{IssuedStatement, RecordingSession};
use chem_structure_query::{parse_similarity_index, CompoundStructureSearch};
use serde_json::json;

/// Pequeña herramienta de inspección: muestra, sin tocar ninguna base de
/// datos, el SQL que cada dialecto emitiría para una operación dada.
///
/// Uso: structure-query <smiles> [similar <50..100> | substructure | pattern | flexmatch]
fn main() -> Result<(), Box<dyn Error>> {
  let args: Vec<String> = std::env::args().skip(1).collect();
  let structure = match args.first() {
    Some(s) => s.clone(),
    None => {
      eprintln!("uso: structure-query <smiles> [similar <50..100> | substructure | pattern | flexmatch]");
      std::process::exit(2);
    }
  };
  let op = args.get(1).map(String::as_str).unwrap_or("similar");
  let search = CompoundStructureSearch::default();

  for vendor in ["oracle", "postgresql"] {
    let mut session = RecordingSession::new(vendor);
    let plan = {
      let query = match op {
        "similar" => {
          let index = parse_similarity_index(args.get(2).map(String::as_str).unwrap_or("70"))?;
          search.similar_to(&mut session, &structure, index)?
        }
        "substructure" => search.with_substructure(&mut session, &structure)?,
        "pattern" => search.with_substructure_pattern(&mut session, &structure)?,
        "flexmatch" => search.flexmatch(&mut session, &structure)?,
        other => {
          eprintln!("operación desconocida: {}", other);
          std::process::exit(2);
        }
      };
      let (sql, params) = query.to_sql();
      json!({ "sql": sql, "params": params })
      // query se descarta aquí: en PostgreSQL eso emite el reset de sesión.
    };
    let session_statements: Vec<String> = session.issued
                                                 .iter()
                                                 .map(|s| match s {
                                                   IssuedStatement::Batch(sql) => sql.clone(),
                                                   IssuedStatement::Query { sql, .. } => sql.clone(),
                                                 })
                                                 .collect();
    let report = json!({
      "vendor": vendor,
      "operation": op,
      "query": plan,
      "session_statements": session_statements,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
  }
  Ok(())
}
