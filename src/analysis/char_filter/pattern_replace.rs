use regex::Regex;

use super::CharFilter;
use crate::error::{EscribaError, Result};

/// A char filter that replaces every match of a regex pattern.
pub struct PatternReplaceCharFilter {
    pattern: Regex,
    replacement: String,
}

impl PatternReplaceCharFilter {
    /// Create a new pattern replace char filter.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern).map_err(|e| {
                EscribaError::config(format!("invalid pattern '{pattern}': {e}"))
            })?,
            replacement: replacement.to_string(),
        })
    }

    /// Replaces anything that is not an ASCII letter or whitespace with a space.
    pub fn non_letters() -> Self {
        Self::new(r"[^a-zA-Z\s]", " ").expect("static pattern is valid")
    }

    /// Collapses whitespace runs into a single space.
    pub fn collapse_whitespace() -> Self {
        Self::new(r"\s+", " ").expect("static pattern is valid")
    }
}

impl CharFilter for PatternReplaceCharFilter {
    fn filter(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement.as_str())
            .into_owned()
    }

    fn name(&self) -> &'static str {
        "pattern_replace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_replace() {
        let filter = PatternReplaceCharFilter::new(r"(\d+)", "NUM").unwrap();
        assert_eq!(filter.filter("Year 2024"), "Year NUM");
    }

    #[test]
    fn test_non_letters() {
        let filter = PatternReplaceCharFilter::non_letters();
        assert_eq!(filter.filter("oi, tudo bem?!"), "oi  tudo bem  ");
        assert_eq!(filter.filter("nota 10"), "nota   ");
    }

    #[test]
    fn test_collapse_whitespace() {
        let filter = PatternReplaceCharFilter::collapse_whitespace();
        assert_eq!(filter.filter("a \t\n b"), "a b");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PatternReplaceCharFilter::new("(", "").is_err());
    }
}
