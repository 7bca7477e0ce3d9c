//! Abbreviation expansion.
//!
//! The dictionary is a flat JSON object mapping lowercase words to their
//! canonical replacement:
//!
//! ```json
//! { "vc": "você", "tb": "também", "pq": "porque" }
//! ```
//!
//! Lookups lower-case the word first and return it unchanged (lower-cased)
//! when there is no entry.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use ahash::AHashMap;

use crate::analysis::tokenizer::WordMatrix;
use crate::error::{EscribaError, Result};

/// Immutable word → canonical form mapping.
#[derive(Debug, Clone, Default)]
pub struct ExpansionDictionary {
    entries: AHashMap<String, String>,
}

impl ExpansionDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        ExpansionDictionary {
            entries: AHashMap::new(),
        }
    }

    /// Build a dictionary from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        ExpansionDictionary {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load the dictionary from a JSON file.
    ///
    /// A missing file, invalid JSON or a non-string value is a configuration
    /// error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EscribaError::config(format!(
                "Failed to read expansion dictionary '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content).map_err(|e| {
            EscribaError::config(format!(
                "Failed to parse expansion dictionary '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse the dictionary from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::from_pairs(entries))
    }

    /// Expand a single word.
    pub fn expand(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        match self.entries.get(&lower) {
            Some(replacement) => replacement.clone(),
            None => lower,
        }
    }

    /// Expand every word of a matrix, preserving its shape.
    pub fn expand_all(&self, words: &WordMatrix) -> WordMatrix {
        words
            .iter()
            .map(|sentence| sentence.iter().map(|word| self.expand(word)).collect())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
