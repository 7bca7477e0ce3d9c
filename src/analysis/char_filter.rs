//! Char filters that rewrite sentence text before word tokenization.
//!
//! # Available Filters
//!
//! - [`unicode_normalize::UnicodeNormalizationCharFilter`] - Unicode normalization, optionally folding to ASCII
//! - [`pattern_replace::PatternReplaceCharFilter`] - Regex-based replacement
//!
//! Filters are applied in order by [`CharFilterChain`].
//!
//! # Examples
//!
//! ```
//! use escriba::analysis::char_filter::{CharFilter, CharFilterChain};
//! use escriba::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
//!
//! let chain = CharFilterChain::new()
//!     .with(PatternReplaceCharFilter::new(r"\d+", " ").unwrap());
//! assert_eq!(chain.filter("abc123def"), "abc def");
//! ```

/// Trait for character filters that transform text.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

/// An ordered sequence of char filters applied one after another.
#[derive(Default)]
pub struct CharFilterChain {
    filters: Vec<Box<dyn CharFilter>>,
}

impl CharFilterChain {
    pub fn new() -> Self {
        CharFilterChain {
            filters: Vec::new(),
        }
    }

    /// Append a filter to the end of the chain.
    pub fn with<F: CharFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl CharFilter for CharFilterChain {
    fn filter(&self, input: &str) -> String {
        self.filters
            .iter()
            .fold(input.to_string(), |text, filter| filter.filter(&text))
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

pub mod pattern_replace;
pub mod unicode_normalize;
