//! Decides whether a submitted query solves a challenge.
//!
//! Deliberately plain: both statements are normalized and the submission must
//! equal the expected text, or the expected text without one known alias.

use crate::sql::parser::normalize;

/// Alias suffixes a player may leave out
const OPTIONAL_ALIASES: &[&str] = &[" as total", " as cantidad"];

/// Lowercase, single-spaced, without a trailing semicolon
fn canonical(sql: &str) -> String {
    let sql = normalize(sql);
    sql.strip_suffix(';').unwrap_or(sql.as_str()).trim_end().to_string()
}

/// Returns true when `submitted` matches `expected` or one of its accepted variants
pub fn is_equivalent(submitted: &str, expected: &str) -> bool {
    let submitted = canonical(submitted);
    if submitted.is_empty() {
        return false;
    }
    let expected = canonical(expected);
    std::iter::once(expected.clone())
        .chain(OPTIONAL_ALIASES.iter().map(|alias| expected.replacen(alias, "", 1)))
        .any(|variant| variant == submitted)
}
