//! Word tokenization.
//!
//! Turns a list of cleaned sentences into a [`WordMatrix`]: one inner list of
//! words per non-empty sentence, in order.
//!
//! # Examples
//!
//! ```
//! use escriba::analysis::tokenizer::WhitespaceTokenizer;
//!
//! let sentences = vec!["oi tudo bem".to_string(), String::new(), "vc viu".to_string()];
//! let words = WhitespaceTokenizer::new().split_words(&sentences);
//! assert_eq!(words, vec![vec!["oi", "tudo", "bem"], vec!["vc", "viu"]]);
//! ```

/// Sentences of words; outer index is the sentence, inner the word.
pub type WordMatrix = Vec<Vec<String>>;

/// A tokenizer that splits sentences on whitespace.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }

    /// Split one sentence into words.
    pub fn tokenize(&self, sentence: &str) -> Vec<String> {
        sentence.split_whitespace().map(str::to_string).collect()
    }

    /// Split every non-empty sentence into words.
    pub fn split_words<S: AsRef<str>>(&self, sentences: &[S]) -> WordMatrix {
        sentences
            .iter()
            .map(AsRef::as_ref)
            .filter(|sentence| !sentence.trim().is_empty())
            .map(|sentence| self.tokenize(sentence))
            .collect()
    }

    pub fn name(&self) -> &'static str {
        "whitespace"
    }
}
