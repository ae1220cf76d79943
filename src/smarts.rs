/// Rewrite a SMILES pattern so every literal aliphatic carbon outside a
/// bracket expression becomes the generic `[#6]` atom, turning the pattern
/// into a substructure query-language template instead of a literal
/// molecule.
///
/// This is legacy behavior preserved token for token: two-character inputs
/// are returned unchanged; a `C` at the first or last position is emitted as
/// `[#6]` directly; a `C` anywhere else is emitted literally and only
/// promoted when the next character turns out to be `)`, by replacing the
/// previously emitted token. Lowercase aromatic `c`, multi-letter elements
/// and bracketed atoms are deliberately left alone.
pub fn generalize_carbons(pattern: &str) -> String {
  let chars: Vec<char> = pattern.chars().collect();
  if chars.len() == 2 {
    return pattern.to_string();
  }
  let last = chars.len().saturating_sub(1);
  let mut out = String::with_capacity(pattern.len() * 2);
  let mut pending_carbon = false;
  for (i, &ch) in chars.iter().enumerate() {
    if ch == ')' && pending_carbon {
      // The previous emitted token is a bare 'C'; swap it for [#6].
      out.truncate(out.len() - 1);
      out.push_str("[#6]");
      out.push(')');
      pending_carbon = false;
    } else if ch == 'C' && (i == 0 || i == last) {
      out.push_str("[#6]");
      pending_carbon = false;
    } else if ch == 'C' {
      out.push('C');
      pending_carbon = true;
    } else {
      out.push(ch);
      pending_carbon = false;
    }
  }
  out
}
