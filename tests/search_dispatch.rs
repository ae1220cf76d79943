use chem_structure_query::stubs::{IssuedStatement, RecordingSession};
use chem_structure_query::{CompoundStructureSearch, StructureQueryError, MOL_TYPE_BOOTSTRAP, TANIMOTO_RESET};

#[test]
fn similar_to_rejects_out_of_range_indices_before_touching_the_session() {
  let search = CompoundStructureSearch::default();
  for index in [-1, 0, 49, 101, 1000] {
    let mut session = RecordingSession::new("postgresql");
    match search.similar_to(&mut session, "CCO", index) {
      Err(StructureQueryError::InvalidSimilarityIndex) => {}
      other => panic!("expected InvalidSimilarityIndex for {}, got {:?}", index, other.map(|_| ())),
    }
    assert!(session.issued.is_empty(), "no statement may be issued for index {}", index);
  }
}

#[test]
fn similarity_index_parsing_matches_the_range_check() {
  use chem_structure_query::parse_similarity_index;
  assert_eq!(parse_similarity_index("75").expect("75"), 75);
  assert_eq!(parse_similarity_index(" 100 ").expect("100"), 100);
  for raw in ["", "abc", "49", "101", "75.5"] {
    match parse_similarity_index(raw) {
      Err(StructureQueryError::InvalidSimilarityIndex) => {}
      other => panic!("expected InvalidSimilarityIndex for {:?}, got {:?}", raw, other),
    }
  }
}

#[test]
fn every_search_method_rejects_unknown_vendors() {
  let search = CompoundStructureSearch::default();
  for vendor in ["mysql", "sqlite", "db2", ""] {
    let mut session = RecordingSession::new(vendor);
    match search.similar_to(&mut session, "CCO", 75) {
      Err(StructureQueryError::UnsupportedBackend(v)) => assert_eq!(v, vendor),
      other => panic!("similar_to: expected UnsupportedBackend, got {:?}", other.map(|_| ())),
    }
    match search.with_substructure(&mut session, "CCO") {
      Err(StructureQueryError::UnsupportedBackend(_)) => {}
      other => panic!("with_substructure: expected UnsupportedBackend, got {:?}", other.map(|_| ())),
    }
    match search.with_substructure_pattern(&mut session, "CCO") {
      Err(StructureQueryError::UnsupportedBackend(_)) => {}
      other => panic!("with_substructure_pattern: expected UnsupportedBackend, got {:?}", other.map(|_| ())),
    }
    match search.flexmatch(&mut session, "CCO") {
      Err(StructureQueryError::UnsupportedBackend(_)) => {}
      other => panic!("flexmatch: expected UnsupportedBackend, got {:?}", other.map(|_| ())),
    }
    assert!(session.issued.is_empty(), "vendor {:?} must never reach the session", vendor);
  }
}

#[test]
fn postgres_similarity_issues_setup_select_and_reset_in_order() {
  let search = CompoundStructureSearch::default();
  let mut session = RecordingSession::new("postgresql");
  {
    let mut query = search.similar_to(&mut session, "CCO", 75).expect("similar_to");
    let rows = query.load().expect("load");
    assert!(rows.is_empty());
  }
  assert_eq!(session.issued.len(), 4, "bootstrap, set, select, reset: {:?}", session.issued);
  assert_eq!(session.issued[0], IssuedStatement::Batch(MOL_TYPE_BOOTSTRAP.to_string()));
  assert_eq!(session.issued[1], IssuedStatement::Batch("set rdkit.tanimoto_threshold=0.75;".to_string()));
  match &session.issued[2] {
    IssuedStatement::Query { sql, params } => {
      let where_clause = sql.split(" WHERE ").nth(1).expect("select has a WHERE clause");
      assert!(where_clause.contains("between 0.75 and 1.0"), "threshold literal missing: {}", sql);
      assert!(sql.contains("tanimoto_sml(torsionbv_fp($1), torsionbv) AS similarity"), "select extra missing: {}", sql);
      assert!(sql.contains("FROM compound_mols, fps_rdkit"), "fingerprint table not joined: {}", sql);
      assert!(where_clause.contains("fps_rdkit.molregno = compound_mols.molregno"), "join predicate missing: {}", sql);
      assert!(where_clause.contains("torsionbv_fp($1) % torsionbv"), "fingerprint operator missing: {}", sql);
      assert!(sql.ends_with("ORDER BY similarity DESC"), "ordering missing: {}", sql);
      assert_eq!(params, &vec!["CCO".to_string()]);
    }
    other => panic!("expected the augmented select, got {:?}", other),
  }
  assert_eq!(session.issued[3], IssuedStatement::Batch(TANIMOTO_RESET.to_string()));
}

#[test]
fn postgres_threshold_is_reset_even_when_the_query_is_never_loaded() {
  let search = CompoundStructureSearch::default();
  let mut session = RecordingSession::new("postgresql");
  {
    let _query = search.similar_to(&mut session, "CCO", 50).expect("similar_to");
    // dropped without load()
  }
  assert_eq!(session.issued,
             vec![IssuedStatement::Batch(MOL_TYPE_BOOTSTRAP.to_string()),
                  IssuedStatement::Batch("set rdkit.tanimoto_threshold=0.5;".to_string()),
                  IssuedStatement::Batch(TANIMOTO_RESET.to_string())]);
}

#[test]
fn postgres_threshold_is_reset_when_the_select_fails() {
  let search = CompoundStructureSearch::default();
  let mut session = RecordingSession::failing("postgresql");
  {
    let mut query = search.similar_to(&mut session, "CCO", 80).expect("similar_to");
    match query.load() {
      Err(StructureQueryError::Database(_)) => {}
      other => panic!("expected the stubbed query failure, got {:?}", other.map(|r| r.len())),
    }
  }
  assert_eq!(session.issued.last(),
             Some(&IssuedStatement::Batch(TANIMOTO_RESET.to_string())),
             "reset must follow the failed select: {:?}",
             session.issued);
}

#[test]
fn oracle_similarity_uses_the_cartridge_function_and_no_session_setup() {
  let search = CompoundStructureSearch::default();
  let mut session = RecordingSession::new("oracle");
  {
    let mut query = search.similar_to(&mut session, "CCO", 85).expect("similar_to");
    let (sql, params) = query.to_sql();
    assert_eq!(sql,
               "SELECT compound_mols.*, TO_NUMBER (molsim (molfile, :structure, 'normal')) AS similarity FROM \
                compound_mols WHERE molsim (molfile, :structure, 'normal') BETWEEN 85 AND '100'");
    assert_eq!(params, vec!["smiles:CCO".to_string()]);
    query.load().expect("load");
  }
  // Only the select itself reaches the session; no setup, no reset.
  assert_eq!(session.issued.len(), 1);
  assert!(matches!(session.issued[0], IssuedStatement::Query { .. }));
}

#[test]
fn substructure_fragments_per_dialect() {
  let search = CompoundStructureSearch::default();

  let mut session = RecordingSession::new("oracle");
  let query = search.with_substructure(&mut session, "c1ccccc1").expect("oracle substructure");
  let (sql, params) = query.to_sql();
  assert_eq!(sql, "SELECT compound_mols.* FROM compound_mols WHERE (sss(molfile, :structure, 'ignore=all')=1)");
  assert_eq!(params, vec!["smiles:c1ccccc1".to_string()]);
  drop(query);

  let mut session = RecordingSession::new("postgresql");
  let query = search.with_substructure(&mut session, "c1ccccc1").expect("pg substructure");
  let (sql, params) = query.to_sql();
  assert_eq!(sql, "SELECT compound_mols.* FROM compound_mols WHERE molfile@>$1");
  assert_eq!(params, vec!["c1ccccc1".to_string()]);
  drop(query);
  assert!(session.issued.is_empty(), "substructure needs no session setup");
}

#[test]
fn pattern_substructure_generalizes_carbons_into_a_qmol_match() {
  let search = CompoundStructureSearch::default();
  let mut session = RecordingSession::new("postgresql");
  let query = search.with_substructure_pattern(&mut session, "C(C)C").expect("pattern substructure");
  let (sql, params) = query.to_sql();
  assert_eq!(sql, "SELECT compound_mols.* FROM compound_mols WHERE molfile@>$1::qmol");
  assert_eq!(params, vec!["[#6]([#6])[#6]".to_string()]);

  // On Oracle the raw pattern goes through the cartridge unchanged.
  let mut session = RecordingSession::new("oracle");
  let query = search.with_substructure_pattern(&mut session, "C(C)C").expect("oracle pattern substructure");
  let (_, params) = query.to_sql();
  assert_eq!(params, vec!["smiles:C(C)C".to_string()]);
}

#[test]
fn flexmatch_fragments_per_dialect() {
  let search = CompoundStructureSearch::default();

  let mut session = RecordingSession::new("oracle");
  let query = search.flexmatch(&mut session, "CC(=O)O").expect("oracle flexmatch");
  let (sql, params) = query.to_sql();
  assert_eq!(sql, "SELECT compound_mols.* FROM compound_mols WHERE (flexmatch(molfile, :structure, 'ignore=all')=1)");
  assert_eq!(params, vec!["smiles:CC(=O)O".to_string()]);
  drop(query);

  let mut session = RecordingSession::new("postgresql");
  let query = search.flexmatch(&mut session, "CC(=O)O").expect("pg flexmatch");
  let (sql, params) = query.to_sql();
  assert_eq!(sql, "SELECT compound_mols.* FROM compound_mols WHERE molfile@=$1");
  assert_eq!(params, vec!["CC(=O)O".to_string()]);
}

#[test]
fn queries_stay_composable_after_construction() {
  let search = CompoundStructureSearch::default();
  let mut session = RecordingSession::new("postgresql");
  let query = search.flexmatch(&mut session, "CCO")
                    .expect("flexmatch")
                    .and_where("compound_mols.molregno >= :min_regno")
                    .bind("min_regno", "1000");
  let (sql, params) = query.to_sql();
  assert_eq!(sql,
             "SELECT compound_mols.* FROM compound_mols WHERE molfile@=$1 and compound_mols.molregno >= $2");
  assert_eq!(params, vec!["CCO".to_string(), "1000".to_string()]);
}
