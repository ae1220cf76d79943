// Archivo: query.rs
// Propósito: el "query augmenter". Acumula fragmentos SQL crudos (columnas
// seleccionadas, predicados WHERE, tablas unidas, ordenación y parámetros
// ligados) y los renderiza para el dialecto activo sin ejecutarlos.
use crate::dialect::SqlDialect;

/// Raw SQL fragments attached to an otherwise ordinary select over one base
/// table. Construction is purely in memory; nothing touches a connection
/// until the owning query is loaded.
///
/// Fragments use named placeholders (`:structure`, `:pattern`). Rendering
/// rewrites them to `$1..$n` for PostgreSQL and leaves the `:name` form for
/// Oracle, collecting bound values in first-occurrence order either way. A
/// `::` type cast (`:pattern::qmol`) is never mistaken for a placeholder.
#[derive(Debug, Clone, Default)]
pub struct QueryExtras {
  select: Vec<(String, String)>,
  where_fragments: Vec<String>,
  tables: Vec<String>,
  order_by: Vec<String>,
  params: Vec<(String, String)>,
}

impl QueryExtras {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a computed column, rendered as `<fragment> AS <alias>`.
  pub fn select_extra(mut self, alias: &str, fragment: &str) -> Self {
    self.select.push((alias.to_string(), fragment.to_string()));
    self
  }

  /// Add a raw WHERE fragment. Fragments are joined with ` and `; any
  /// grouping parentheses must be part of the fragment itself.
  pub fn and_where(mut self, fragment: &str) -> Self {
    self.where_fragments.push(fragment.to_string());
    self
  }

  /// Add an extra table to the FROM list (implicit join; the join condition
  /// lives in a WHERE fragment).
  pub fn table(mut self, table: &str) -> Self {
    self.tables.push(table.to_string());
    self
  }

  pub fn order_by(mut self, expr: &str) -> Self {
    self.order_by.push(expr.to_string());
    self
  }

  /// Bind a value to a named placeholder. Every occurrence of `:name` in
  /// the assembled statement refers to the same value.
  pub fn bind(mut self, name: &str, value: &str) -> Self {
    self.params.push((name.to_string(), value.to_string()));
    self
  }

  /// Render the full select for the given dialect. Returns the statement
  /// and the bound values in the order the driver expects them.
  pub fn render(&self, dialect: SqlDialect, base_table: &str) -> (String, Vec<String>) {
    let mut sql = format!("SELECT {}.*", base_table);
    for (alias, fragment) in &self.select {
      sql.push_str(&format!(", {} AS {}", fragment, alias));
    }
    sql.push_str(&format!(" FROM {}", base_table));
    for table in &self.tables {
      sql.push_str(&format!(", {}", table));
    }
    if !self.where_fragments.is_empty() {
      sql.push_str(" WHERE ");
      sql.push_str(&self.where_fragments.join(" and "));
    }
    if !self.order_by.is_empty() {
      sql.push_str(" ORDER BY ");
      sql.push_str(&self.order_by.join(", "));
    }
    rewrite_placeholders(&sql, &self.params, dialect)
  }
}

/// Scan the assembled statement for `:name` placeholders and produce the
/// dialect's native bind syntax plus the ordered parameter values. Names
/// without a bound value are left untouched, as is anything following a
/// `::` cast.
fn rewrite_placeholders(sql: &str, params: &[(String, String)], dialect: SqlDialect) -> (String, Vec<String>) {
  let chars: Vec<char> = sql.chars().collect();
  let mut out = String::with_capacity(sql.len());
  let mut ordered: Vec<String> = Vec::new();
  let mut indices: Vec<(String, usize)> = Vec::new();
  let mut i = 0;
  while i < chars.len() {
    let ch = chars[i];
    let prev_is_colon = i > 0 && chars[i - 1] == ':';
    let next_starts_name = chars.get(i + 1).is_some_and(|c| c.is_ascii_alphabetic() || *c == '_');
    if ch == ':' && !prev_is_colon && next_starts_name {
      let start = i + 1;
      let mut end = start;
      while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_') {
        end += 1;
      }
      let name: String = chars[start..end].iter().collect();
      if let Some((_, value)) = params.iter().find(|(n, _)| *n == name) {
        let idx = match indices.iter().find(|(n, _)| *n == name) {
          Some((_, idx)) => *idx,
          None => {
            ordered.push(value.clone());
            indices.push((name.clone(), ordered.len()));
            ordered.len()
          }
        };
        match dialect {
          SqlDialect::Postgresql => out.push_str(&format!("${}", idx)),
          SqlDialect::Oracle => {
            out.push(':');
            out.push_str(&name);
          }
        }
        i = end;
        continue;
      }
      // Unknown name: emit literally so stray colons in fragments survive.
      out.push(':');
      out.push_str(&name);
      i = end;
      continue;
    }
    out.push(ch);
    i += 1;
  }
  (out, ordered)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_plain_select_without_extras() {
    let (sql, params) = QueryExtras::new().render(SqlDialect::Postgresql, "compound_mols");
    assert_eq!(sql, "SELECT compound_mols.* FROM compound_mols");
    assert!(params.is_empty());
  }

  #[test]
  fn postgres_placeholders_are_numbered_and_deduplicated() {
    let extras = QueryExtras::new().and_where("torsionbv_fp(:structure) % torsionbv")
                                   .and_where("tanimoto_sml(torsionbv_fp(:structure), torsionbv) between 0.75 and 1.0")
                                   .bind("structure", "CCO");
    let (sql, params) = extras.render(SqlDialect::Postgresql, "compound_mols");
    assert_eq!(sql,
               "SELECT compound_mols.* FROM compound_mols WHERE torsionbv_fp($1) % torsionbv and \
                tanimoto_sml(torsionbv_fp($1), torsionbv) between 0.75 and 1.0");
    assert_eq!(params, vec!["CCO".to_string()]);
  }

  #[test]
  fn oracle_keeps_named_placeholders() {
    let extras = QueryExtras::new().and_where("(sss(molfile, :structure, 'ignore=all')=1)")
                                   .bind("structure", "smiles:CCO");
    let (sql, params) = extras.render(SqlDialect::Oracle, "compound_mols");
    assert_eq!(sql, "SELECT compound_mols.* FROM compound_mols WHERE (sss(molfile, :structure, 'ignore=all')=1)");
    assert_eq!(params, vec!["smiles:CCO".to_string()]);
  }

  #[test]
  fn double_colon_casts_are_not_placeholders() {
    let extras = QueryExtras::new().and_where("molfile@>:pattern::qmol").bind("pattern", "[#6]([#6])[#6]");
    let (sql, params) = extras.render(SqlDialect::Postgresql, "compound_mols");
    assert_eq!(sql, "SELECT compound_mols.* FROM compound_mols WHERE molfile@>$1::qmol");
    assert_eq!(params, vec!["[#6]([#6])[#6]".to_string()]);
  }

  #[test]
  fn select_extras_tables_and_ordering_are_rendered() {
    let extras = QueryExtras::new().select_extra("similarity", "tanimoto_sml(torsionbv_fp(:structure), torsionbv)")
                                   .table("fps_rdkit")
                                   .and_where("fps_rdkit.molregno = compound_mols.molregno")
                                   .order_by("similarity DESC")
                                   .bind("structure", "CCO");
    let (sql, params) = extras.render(SqlDialect::Postgresql, "compound_mols");
    assert_eq!(sql,
               "SELECT compound_mols.*, tanimoto_sml(torsionbv_fp($1), torsionbv) AS similarity FROM compound_mols, \
                fps_rdkit WHERE fps_rdkit.molregno = compound_mols.molregno ORDER BY similarity DESC");
    assert_eq!(params, vec!["CCO".to_string()]);
  }

  #[test]
  fn unbound_names_survive_untouched() {
    let extras = QueryExtras::new().and_where("alias.col = other.col and note = ':free'");
    let (sql, _) = extras.render(SqlDialect::Postgresql, "t");
    assert!(sql.contains(":free"), "unbound colon token must be preserved: {}", sql);
  }
}
