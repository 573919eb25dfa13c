//! [`SearchPattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

/// Case-insensitive substring pattern to be used with SQL `LIKE`.
///
/// The pattern is lowercased, so it has to be matched against a
/// `LOWER(..)`ed column.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct SearchPattern(String);

impl SearchPattern {
    /// Creates a new [`SearchPattern`] matching any text containing the given
    /// `needle`, with `LIKE` wildcards escaped.
    #[must_use]
    pub fn new(needle: &str) -> Self {
        let escaped = needle
            .trim()
            .to_lowercase()
            .replace('\\', r"\\")
            .replace('%', r"\%")
            .replace('_', r"\_");
        Self(format!("%{escaped}%"))
    }
}

#[cfg(test)]
mod spec {
    use super::SearchPattern;

    #[test]
    fn escapes_wildcards() {
        assert_eq!(SearchPattern::new(" Main ").to_string(), "%main%");
        assert_eq!(
            SearchPattern::new(r"100%_a\b").to_string(),
            r"%100\%\_a\\b%",
        );
    }
}
