//! Sentence segmentation and cleaning.
//!
//! Boundary detection is delegated to a [`SentenceSegmenter`]; the bundled
//! [`UnicodeSentenceSegmenter`] applies the Unicode sentence boundary rules
//! (UAX #29). Each resulting span is then folded to plain ASCII letters and
//! single spaces by the [`SentenceTokenizer`].
//!
//! # Examples
//!
//! ```
//! use escriba::analysis::sentence::SentenceTokenizer;
//!
//! let tokenizer = SentenceTokenizer::default();
//! let sentences = tokenizer.split_sentences("Você viu? Ótimo vídeo!").unwrap();
//! assert_eq!(sentences, vec!["Voce viu", "Otimo video"]);
//! ```

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::analysis::char_filter::unicode_normalize::UnicodeNormalizationCharFilter;
use crate::analysis::char_filter::{CharFilter, CharFilterChain};
use crate::error::Result;

/// Splits text into sentence spans.
///
/// Implementations wrap whatever linguistic analyzer is available. A failing
/// analyzer returns an error; the pipeline turns it into an empty stage
/// output.
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Result<Vec<String>>;

    fn name(&self) -> &'static str;
}

/// Segments on Unicode sentence boundaries.
#[derive(Clone, Debug, Default)]
pub struct UnicodeSentenceSegmenter;

impl UnicodeSentenceSegmenter {
    pub fn new() -> Self {
        UnicodeSentenceSegmenter
    }
}

impl SentenceSegmenter for UnicodeSentenceSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<String>> {
        Ok(text
            .unicode_sentences()
            .map(|sentence| sentence.to_string())
            .collect())
    }

    fn name(&self) -> &'static str {
        "unicode_sentence"
    }
}

/// Segments text and cleans every span.
pub struct SentenceTokenizer {
    segmenter: Arc<dyn SentenceSegmenter>,
    cleaner: CharFilterChain,
}

impl SentenceTokenizer {
    pub fn new(segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        let cleaner = CharFilterChain::new()
            .with(UnicodeNormalizationCharFilter::ascii_folding())
            .with(PatternReplaceCharFilter::non_letters())
            .with(PatternReplaceCharFilter::collapse_whitespace());

        SentenceTokenizer { segmenter, cleaner }
    }

    /// Segment `text` and clean each sentence.
    ///
    /// Sentences that clean down to nothing are kept as empty strings so the
    /// output lines up with the segmenter's spans; the word tokenizer drops
    /// them.
    pub fn split_sentences(&self, text: &str) -> Result<Vec<String>> {
        let spans = self.segmenter.segment(text)?;
        Ok(spans.iter().map(|span| self.clean(span)).collect())
    }

    /// Fold a single span to ASCII letters separated by single spaces.
    pub fn clean(&self, span: &str) -> String {
        self.cleaner.filter(span).trim().to_string()
    }

    pub fn segmenter_name(&self) -> &'static str {
        self.segmenter.name()
    }
}

impl Default for SentenceTokenizer {
    fn default() -> Self {
        Self::new(Arc::new(UnicodeSentenceSegmenter::new()))
    }
}
