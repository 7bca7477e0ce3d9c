//! Word list with frequencies used by the suggestion engine.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;

use crate::error::{EscribaError, Result};
use crate::spelling::frequency::FrequencyModel;

/// A dictionary that stores words and their frequencies for spelling correction.
#[derive(Debug, Clone, Default)]
pub struct SpellingDictionary {
    /// Words and their frequencies
    words: AHashMap<String, u64>,
    /// Sum of all frequencies
    total_count: u64,
}

impl SpellingDictionary {
    /// Create a new empty dictionary.
    pub fn new() -> Self {
        SpellingDictionary {
            words: AHashMap::new(),
            total_count: 0,
        }
    }

    /// Add a word to the dictionary with the given frequency.
    pub fn add_word(&mut self, word: &str, frequency: u64) {
        let normalized = word.to_lowercase();
        let old_freq = self.words.insert(normalized, frequency).unwrap_or(0);
        self.total_count = self.total_count - old_freq + frequency;
    }

    /// Check if a word exists in the dictionary.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(&word.to_lowercase())
    }

    /// Get the frequency of a word.
    pub fn frequency(&self, word: &str) -> u64 {
        self.words.get(&word.to_lowercase()).copied().unwrap_or(0)
    }

    /// Get the total number of unique words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Get the total frequency count.
    pub fn total_frequency(&self) -> u64 {
        self.total_count
    }

    /// Every word of a frequency model, with its count.
    pub fn from_frequency_model(model: &FrequencyModel) -> Self {
        let mut dictionary = SpellingDictionary::new();
        for (word, count) in model.iter() {
            dictionary.add_word(word, count);
        }
        dictionary
    }

    /// Load dictionary from a frequency file with format "word frequency" per line.
    ///
    /// Blank lines and lines starting with `#` are skipped; any other line
    /// that does not parse is a configuration error.
    pub fn load_from_frequency_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            EscribaError::config(format!(
                "Failed to open spelling dictionary '{}': {}",
                path.display(),
                e
            ))
        })?;
        let reader = BufReader::new(file);
        let mut dictionary = SpellingDictionary::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let entry = match (parts.next(), parts.next()) {
                (Some(word), Some(frequency)) => frequency
                    .parse::<u64>()
                    .ok()
                    .filter(|_| word.chars().all(char::is_alphabetic))
                    .map(|frequency| (word, frequency)),
                _ => None,
            };

            match entry {
                Some((word, frequency)) => dictionary.add_word(word, frequency),
                None => {
                    return Err(EscribaError::config(format!(
                        "{}:{}: expected 'word frequency', found '{}'",
                        path.display(),
                        number + 1,
                        line
                    )));
                }
            }
        }

        Ok(dictionary)
    }
}
