//! Word-count model built from a reference corpus.
//!
//! Corpus text is folded to ASCII (diacritics stripped, the same folding the
//! sentence tokenizer applies), lower-cased and split into maximal runs of
//! letters, so digits and punctuation never become tokens. The model is built
//! once and only read afterwards; unseen words count as zero.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use log::debug;

use crate::analysis::char_filter::CharFilter;
use crate::analysis::char_filter::unicode_normalize::UnicodeNormalizationCharFilter;
use crate::config::CorpusFormat;
use crate::error::{EscribaError, Result};

/// Immutable word → occurrence count table.
#[derive(Debug, Clone, Default)]
pub struct FrequencyModel {
    counts: AHashMap<String, u64>,
    total: u64,
}

impl FrequencyModel {
    /// Build a model from running text.
    pub fn build<I, S>(corpus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build_with_format(corpus, CorpusFormat::Plain)
    }

    /// Build a model from corpus documents in the given format.
    pub fn build_with_format<I, S>(corpus: I, format: CorpusFormat) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let folding = UnicodeNormalizationCharFilter::ascii_folding();
        let mut counts: AHashMap<String, u64> = AHashMap::new();
        let mut total = 0;

        for document in corpus {
            let document = document.as_ref();
            let mut add = |text: &str| {
                for token in tokens(&folding.filter(text)) {
                    *counts.entry(token).or_insert(0) += 1;
                    total += 1;
                }
            };

            match format {
                CorpusFormat::Plain => add(document),
                CorpusFormat::Tagged => {
                    for tagged in document.split_whitespace() {
                        add(strip_tag(tagged));
                    }
                }
            }
        }

        FrequencyModel { counts, total }
    }

    /// Build a model from explicit counts.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let counts: AHashMap<String, u64> = counts
            .into_iter()
            .map(|(word, count)| (word.into(), count))
            .collect();
        let total = counts.values().sum();
        FrequencyModel { counts, total }
    }

    /// Read every corpus file (directories are read recursively, in sorted
    /// order) and build a model from them.
    pub fn load_corpus<P: AsRef<Path>>(paths: &[P], format: CorpusFormat) -> Result<Self> {
        let mut files = Vec::new();
        for path in paths {
            collect_files(path.as_ref(), &mut files)?;
        }
        if files.is_empty() {
            return Err(EscribaError::config("no corpus files found"));
        }

        let mut documents = Vec::with_capacity(files.len());
        for file in &files {
            let bytes = fs::read(file).map_err(|e| {
                EscribaError::config(format!(
                    "Failed to read corpus file '{}': {}",
                    file.display(),
                    e
                ))
            })?;
            documents.push(String::from_utf8_lossy(&bytes).into_owned());
        }

        let model = Self::build_with_format(&documents, format);
        debug!(
            "Built frequency model from {} corpus files: {} distinct words, {} tokens",
            files.len(),
            model.len(),
            model.total()
        );
        Ok(model)
    }

    /// Occurrence count of `word`, zero when unseen.
    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Count of `word` after folding it the way corpus text is folded, so
    /// `você` and `voce` share a count.
    pub fn count_folded(&self, word: &str) -> u64 {
        self.count(&fold(word))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of tokens counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Iterate over `(word, count)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(word, count)| (word.as_str(), *count))
    }
}

/// Strip diacritics from a word, borrowing when it is already ASCII.
pub fn fold(word: &str) -> Cow<'_, str> {
    if word.is_ascii() {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(UnicodeNormalizationCharFilter::ascii_folding().filter(word))
    }
}

/// Split text into lowercase `[a-z]+` tokens.
pub fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|token| !token.is_empty())
        .map(str::to_ascii_lowercase)
}

/// `palavra_N` → `palavra`. Tokens without a tag are returned as is.
fn strip_tag(tagged: &str) -> &str {
    match tagged.rfind('_') {
        Some(idx) if idx > 0 => &tagged[..idx],
        _ => tagged,
    }
}

fn collect_files(path: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| {
        EscribaError::config(format!("Corpus path '{}': {}", path.display(), e))
    })?;

    if metadata.is_dir() {
        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();
        for entry in entries {
            collect_files(&entry, files)?;
        }
    } else {
        files.push(path.to_path_buf());
    }
    Ok(())
}
