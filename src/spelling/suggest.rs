//! Dictionary-backed spelling suggestions.
//!
//! [`SuggestionEngine`] is the bundled [`SpellChecker`]: known words are
//! returned unchanged, otherwise dictionary words within the configured edit
//! distance are ranked by a blend of edit distance, frequency and shared
//! prefix.

use std::cmp::Ordering;
use std::sync::Arc;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::spelling::corrector::SpellChecker;
use crate::spelling::dictionary::SpellingDictionary;
use crate::spelling::edits::EditGenerator;
use crate::spelling::frequency::fold;
use crate::spelling::levenshtein::{damerau_levenshtein_distance, prefix_similarity};

/// A spelling suggestion with a score indicating confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The suggested word.
    pub word: String,
    /// Confidence score, higher is better.
    pub score: f64,
    /// Edit distance from the original word.
    pub distance: usize,
    /// Frequency of the suggested word in the dictionary.
    pub frequency: u64,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(word: String, score: f64, distance: usize, frequency: u64) -> Self {
        Suggestion {
            word,
            score,
            distance,
            frequency,
        }
    }

    /// Best first: higher score, then smaller distance, then alphabetical.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.distance.cmp(&other.distance))
            .then_with(|| self.word.cmp(&other.word))
    }
}

/// Configuration for spelling suggestion generation.
#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    /// Maximum edit distance to consider.
    pub max_distance: usize,
    /// Maximum number of suggestions to return.
    pub max_suggestions: usize,
    /// Minimum frequency threshold for suggestions.
    pub min_frequency: u64,
    /// Weight for edit distance in scoring.
    pub distance_weight: f64,
    /// Weight for word frequency in scoring.
    pub frequency_weight: f64,
    /// Letters used to generate candidates.
    pub alphabet: String,
    /// Unknown words longer than this get no suggestions.
    pub max_word_len: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        SuggestionConfig {
            max_distance: 2,
            max_suggestions: 5,
            min_frequency: 1,
            distance_weight: 0.6,
            frequency_weight: 0.4,
            alphabet: crate::config::DEFAULT_ALPHABET.to_string(),
            max_word_len: crate::config::DEFAULT_MAX_WORD_LEN,
        }
    }
}

/// Main spelling suggestion engine.
pub struct SuggestionEngine {
    dictionary: Arc<SpellingDictionary>,
    generator: EditGenerator,
    config: SuggestionConfig,
}

impl SuggestionEngine {
    /// Create a new suggestion engine with the given dictionary.
    pub fn new(dictionary: impl Into<Arc<SpellingDictionary>>) -> Self {
        Self::with_config(dictionary, SuggestionConfig::default())
    }

    /// Create a new suggestion engine with custom configuration.
    pub fn with_config(
        dictionary: impl Into<Arc<SpellingDictionary>>,
        config: SuggestionConfig,
    ) -> Self {
        SuggestionEngine {
            dictionary: dictionary.into(),
            generator: EditGenerator::new(&config.alphabet),
            config,
        }
    }

    /// Get suggestions for a potentially misspelled word, best first.
    pub fn suggest(&self, word: &str) -> Vec<Suggestion> {
        let word_lower = word.to_lowercase();

        // If the word is already in the dictionary, return it as the top suggestion
        let frequency = self
            .dictionary
            .frequency(&word_lower)
            .max(self.dictionary.frequency(&fold(&word_lower)));
        if frequency > 0 {
            return vec![Suggestion::new(word_lower, 1.0, 0, frequency)];
        }
        if word_lower.chars().count() > self.config.max_word_len {
            return Vec::new();
        }

        let mut candidates: AHashSet<String> = AHashSet::new();
        self.generator
            .for_each_variant(&word_lower, self.config.max_distance, |variant, _| {
                if !candidates.contains(variant)
                    && self.dictionary.frequency(variant) >= self.config.min_frequency
                {
                    candidates.insert(variant.to_string());
                }
            });

        let mut suggestions: Vec<Suggestion> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let distance = damerau_levenshtein_distance(&word_lower, &candidate);
                if distance > self.config.max_distance {
                    return None;
                }
                let frequency = self.dictionary.frequency(&candidate);
                let score = self.calculate_score(&word_lower, &candidate, distance, frequency);
                Some(Suggestion::new(candidate, score, distance, frequency))
            })
            .collect();

        suggestions.sort_by(Suggestion::rank);
        suggestions.truncate(self.config.max_suggestions);
        suggestions
    }

    /// The single best suggestion, if any.
    pub fn best(&self, word: &str) -> Option<String> {
        self.suggest(word).into_iter().next().map(|s| s.word)
    }

    /// Calculate a confidence score for a suggestion.
    fn calculate_score(
        &self,
        original: &str,
        candidate: &str,
        distance: usize,
        frequency: u64,
    ) -> f64 {
        // Distance score (closer distance = higher score)
        let distance_score = 1.0 / (1.0 + distance as f64);

        // Frequency score (logarithmic scale to prevent domination by very common words)
        let total = self.dictionary.total_frequency();
        let frequency_score = if frequency == 0 || total <= 1 {
            0.0
        } else {
            (1.0 + frequency as f64).ln() / (1.0 + total as f64).ln()
        };

        // Words starting with the same letters are more likely correct
        let prefix_bonus = 1.0 + prefix_similarity(original, candidate) * 0.2;

        (distance_score * self.config.distance_weight
            + frequency_score * self.config.frequency_weight)
            * prefix_bonus
    }

    /// Check if a word exists in the dictionary.
    pub fn is_correct(&self, word: &str) -> bool {
        self.dictionary.contains(word)
    }

    /// Get dictionary statistics.
    pub fn dictionary_stats(&self) -> (usize, u64) {
        (
            self.dictionary.word_count(),
            self.dictionary.total_frequency(),
        )
    }
}

impl SpellChecker for SuggestionEngine {
    fn correction(&self, word: &str) -> Result<Option<String>> {
        Ok(self.best(word))
    }

    fn name(&self) -> &'static str {
        "suggestion_engine"
    }
}
