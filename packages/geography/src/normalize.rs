//! Place-name normalization.
//!
//! A deterministic pipeline applied symmetrically at index time and query
//! time, so "kuala  lumpur" and "Kuala Lumpur" produce the same key. No
//! fuzzy or edit-distance matching.

use regex::Regex;
use std::sync::LazyLock;

/// Regex to collapse runs of whitespace into a single space.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// Normalizes a place name for matching.
///
/// The pipeline:
/// 1. Uppercase
/// 2. Collapse whitespace
/// 3. Trim
#[must_use]
pub fn normalize(input: &str) -> String {
    let upper = input.to_uppercase();
    WHITESPACE_RE.replace_all(&upper, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_mixed_case() {
        assert_eq!(normalize("kuala lumpur"), "KUALA LUMPUR");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("Shah   Alam"), "SHAH ALAM");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize("  Klang \t"), "KLANG");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize("   "), "");
    }
}
