//! Word-matrix spelling correction strategies.
//!
//! Two strategies are provided:
//!
//! - [`FrequencyCorrector`] picks, for every word, the most frequent
//!   candidate among the word itself and its bounded edit variants.
//! - [`LibraryCorrector`] delegates each word to a [`SpellChecker`] and
//!   memoizes the answers for the duration of one run.
//!
//! Both keep the shape of the matrix they are given.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ahash::{AHashMap, AHashSet};
use log::debug;
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::WordMatrix;
use crate::config::CorrectorConfig;
use crate::error::{EscribaError, Result};
use crate::spelling::edits::EditGenerator;
use crate::spelling::frequency::FrequencyModel;

/// A spelling capability that proposes a single correction for a word.
pub trait SpellChecker: Send + Sync {
    /// Best correction for `word`, or `None` when there is nothing to offer.
    fn correction(&self, word: &str) -> Result<Option<String>>;

    /// Name used in logs.
    fn name(&self) -> &'static str;
}

/// Corrects every word of a word matrix.
pub trait Corrector: Send + Sync {
    /// Output has the same outer and inner lengths as `words`.
    fn correct_all(&self, words: &WordMatrix) -> Result<WordMatrix>;

    fn name(&self) -> &'static str;
}

/// The candidate chosen for a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub word: String,
    /// Round of edit generation that produced the word, 0 for the input.
    pub distance: usize,
    /// Frequency model count.
    pub count: u64,
}

impl Correction {
    /// Whether a candidate beats this one: higher count, then smaller
    /// distance, then lexical order.
    fn is_beaten_by(&self, word: &str, distance: usize, count: u64) -> bool {
        count > self.count
            || (count == self.count
                && (distance < self.distance
                    || (distance == self.distance && word < self.word.as_str())))
    }
}

/// Frequency and edit-distance corrector.
#[derive(Debug, Clone)]
pub struct FrequencyCorrector {
    model: Arc<FrequencyModel>,
    generator: EditGenerator,
    max_distance: usize,
    max_word_len: usize,
    parallel: bool,
}

impl FrequencyCorrector {
    /// Corrector with the default alphabet and a maximum distance of 2.
    pub fn new(model: Arc<FrequencyModel>) -> Self {
        Self::with_config(model, &CorrectorConfig::default())
    }

    pub fn with_config(model: Arc<FrequencyModel>, config: &CorrectorConfig) -> Self {
        FrequencyCorrector {
            model,
            generator: EditGenerator::new(&config.alphabet),
            max_distance: config.max_distance,
            max_word_len: config.max_word_len,
            parallel: config.parallel,
        }
    }

    pub fn max_distance(&self) -> usize {
        self.max_distance
    }

    /// Select the best candidate for `word`.
    ///
    /// The word itself competes at distance 0 with the count of its folded
    /// form, so it wins every tie on count and accented words the corpus
    /// knows are kept as written. When no candidate has a positive count the
    /// word is kept, as is any word longer than the configured
    /// `max_word_len`.
    pub fn best_candidate(&self, word: &str) -> Correction {
        let mut best = Correction {
            word: word.to_string(),
            distance: 0,
            count: self.model.count_folded(word),
        };
        if word.chars().count() > self.max_word_len {
            return best;
        }

        self.generator
            .for_each_variant(word, self.max_distance, |variant, distance| {
                let count = self.model.count(variant);
                if count > 0 && best.is_beaten_by(variant, distance, count) {
                    best = Correction {
                        word: variant.to_string(),
                        distance,
                        count,
                    };
                }
            });

        best
    }

    /// Corrected form of a single word.
    pub fn correct(&self, word: &str) -> String {
        self.best_candidate(word).word
    }

    /// Correct a word matrix, computing each distinct word once.
    pub fn correct_words(&self, words: &WordMatrix) -> WordMatrix {
        let mut seen = AHashSet::new();
        let unique: Vec<&str> = words
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|word| seen.insert(*word))
            .collect();

        let corrected: Vec<(&str, String)> = if self.parallel {
            unique
                .par_iter()
                .map(|word| (*word, self.correct(word)))
                .collect()
        } else {
            unique
                .iter()
                .map(|word| (*word, self.correct(word)))
                .collect()
        };
        let corrected: AHashMap<&str, String> = corrected.into_iter().collect();

        debug!(
            "Frequency correction: {} distinct words, {} changed",
            corrected.len(),
            corrected.iter().filter(|&(from, to)| *from != to.as_str()).count()
        );

        words
            .iter()
            .map(|sentence| {
                sentence
                    .iter()
                    .map(|word| {
                        corrected
                            .get(word.as_str())
                            .cloned()
                            .unwrap_or_else(|| word.clone())
                    })
                    .collect()
            })
            .collect()
    }
}

impl Corrector for FrequencyCorrector {
    fn correct_all(&self, words: &WordMatrix) -> Result<WordMatrix> {
        Ok(self.correct_words(words))
    }

    fn name(&self) -> &'static str {
        "frequency"
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// Word → correction memo shared by the workers of one run.
#[derive(Debug, Default)]
pub struct CorrectionCache {
    entries: RwLock<AHashMap<String, String>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl CorrectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, word: &str) -> Option<String> {
        let hit = self.entries.read().get(word).cloned();
        match hit {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        hit
    }

    pub fn insert(&self, word: &str, correction: String) {
        self.entries.write().insert(word.to_string(), correction);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

/// Corrector backed by a [`SpellChecker`].
#[derive(Clone)]
pub struct LibraryCorrector {
    checker: Arc<dyn SpellChecker>,
    parallel: bool,
}

impl LibraryCorrector {
    pub fn new(checker: Arc<dyn SpellChecker>) -> Self {
        LibraryCorrector {
            checker,
            parallel: true,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn checker_name(&self) -> &'static str {
        self.checker.name()
    }

    /// Correct a word matrix with a fresh cache.
    pub fn correct_words(&self, words: &WordMatrix) -> Result<WordMatrix> {
        let cache = CorrectionCache::new();
        let corrected = self.correct_words_with(&cache, words)?;

        let stats = cache.stats();
        debug!(
            "Library correction ({}): {} hits, {} misses, {} cached words",
            self.checker.name(),
            stats.hits,
            stats.misses,
            stats.entries
        );
        Ok(corrected)
    }

    /// Correct a word matrix through the given cache.
    pub fn correct_words_with(
        &self,
        cache: &CorrectionCache,
        words: &WordMatrix,
    ) -> Result<WordMatrix> {
        let correct_sentence = |sentence: &Vec<String>| -> Result<Vec<String>> {
            sentence
                .iter()
                .map(|word| self.correct_cached(cache, word))
                .collect()
        };

        if self.parallel {
            words.par_iter().map(correct_sentence).collect()
        } else {
            words.iter().map(correct_sentence).collect()
        }
    }

    fn correct_cached(&self, cache: &CorrectionCache, word: &str) -> Result<String> {
        if let Some(corrected) = cache.get(word) {
            return Ok(corrected);
        }

        let corrected = self
            .checker
            .correction(word)
            .map_err(|e| {
                EscribaError::correction(format!(
                    "{} failed on '{}': {}",
                    self.checker.name(),
                    word,
                    e
                ))
            })?
            .unwrap_or_else(|| word.to_string());
        cache.insert(word, corrected.clone());
        Ok(corrected)
    }
}

impl Corrector for LibraryCorrector {
    fn correct_all(&self, words: &WordMatrix) -> Result<WordMatrix> {
        self.correct_words(words)
    }

    fn name(&self) -> &'static str {
        "library"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[&str]]) -> WordMatrix {
        rows.iter()
            .map(|row| row.iter().map(|w| w.to_string()).collect())
            .collect()
    }

    fn corrector(counts: &[(&str, u64)], max_distance: usize) -> FrequencyCorrector {
        let model = FrequencyModel::from_counts(counts.iter().copied());
        let config = CorrectorConfig {
            max_distance,
            ..Default::default()
        };
        FrequencyCorrector::with_config(Arc::new(model), &config)
    }

    #[test]
    fn test_more_frequent_neighbour_wins() {
        let corrector = corrector(&[("casa", 50), ("caza", 1)], 1);
        assert_eq!(corrector.correct("caza"), "casa");

        let best = corrector.best_candidate("caza");
        assert_eq!(best.distance, 1);
        assert_eq!(best.count, 50);
    }

    #[test]
    fn test_known_words_are_kept() {
        let corrector = corrector(&[("casa", 50), ("rua", 20), ("bom", 30)], 2);
        for word in ["casa", "rua", "bom"] {
            assert_eq!(corrector.correct(word), word);
        }
    }

    #[test]
    fn test_accented_known_word_is_kept() {
        let corrector = corrector(&[("voce", 10), ("tambem", 3)], 1);
        assert_eq!(corrector.correct("você"), "você");
        assert_eq!(corrector.correct("também"), "também");
        assert_eq!(corrector.correct("vode"), "voce");
    }

    #[test]
    fn test_unknown_word_without_candidates_is_kept() {
        let corrector = corrector(&[("casa", 50)], 2);
        assert_eq!(corrector.correct("xyzxyz"), "xyzxyz");
        assert_eq!(corrector.best_candidate("xyzxyz").count, 0);
    }

    #[test]
    fn test_overlong_word_is_kept() {
        let corrector = corrector(&[("kkk", 50)], 2);
        let laughter = "k".repeat(200);
        assert_eq!(corrector.correct(&laughter), laughter);
        assert_eq!(corrector.correct("kkkk"), "kkk");
    }

    #[test]
    fn test_tie_prefers_original_word() {
        let corrector = corrector(&[("caza", 10), ("casa", 10)], 1);
        assert_eq!(corrector.correct("caza"), "caza");
    }

    #[test]
    fn test_tie_prefers_smaller_distance() {
        // "casas" is two edits from "caza", "casa" one
        let corrector = corrector(&[("casa", 10), ("casas", 10)], 2);
        assert_eq!(corrector.correct("caza"), "casa");
    }

    #[test]
    fn test_tie_prefers_lexical_order() {
        // Both one replacement away from "bala"
        let corrector = corrector(&[("mala", 5), ("cala", 5)], 1);
        assert_eq!(corrector.correct("bala"), "cala");
    }

    #[test]
    fn test_distance_bounds_search() {
        let corrector_one = corrector(&[("casas", 10)], 1);
        assert_eq!(corrector_one.correct("caza"), "caza");

        let corrector_two = corrector(&[("casas", 10)], 2);
        assert_eq!(corrector_two.correct("caza"), "casas");
    }

    #[test]
    fn test_correct_words_keeps_shape() {
        let corrector = corrector(&[("casa", 50), ("muito", 20), ("bom", 10)], 1);
        let words = matrix(&[&["caza", "muitoo"], &[], &["bon", "caza", "bom"]]);

        let corrected = corrector.correct_words(&words);
        assert_eq!(
            corrected,
            matrix(&[&["casa", "muito"], &[], &["bom", "casa", "bom"]])
        );

        let sequential = FrequencyCorrector {
            parallel: false,
            ..corrector.clone()
        };
        assert_eq!(sequential.correct_all(&words).unwrap(), corrected);
    }

    struct CountingChecker {
        calls: AtomicUsize,
    }

    impl SpellChecker for CountingChecker {
        fn correction(&self, word: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(match word {
                "caza" => Some("casa".to_string()),
                _ => None,
            })
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    struct FailingChecker;

    impl SpellChecker for FailingChecker {
        fn correction(&self, _word: &str) -> Result<Option<String>> {
            Err(EscribaError::other("dictionary unavailable"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn test_library_corrector_memoizes() {
        let checker = Arc::new(CountingChecker {
            calls: AtomicUsize::new(0),
        });
        let corrector = LibraryCorrector::new(checker.clone()).with_parallel(false);
        let words = matrix(&[&["caza", "xyz", "caza"], &["caza"]]);

        let cache = CorrectionCache::new();
        let corrected = corrector.correct_words_with(&cache, &words).unwrap();

        assert_eq!(corrected, matrix(&[&["casa", "xyz", "casa"], &["casa"]]));
        assert_eq!(checker.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 2,
                misses: 2,
                entries: 2
            }
        );
    }

    #[test]
    fn test_library_corrector_cache_is_per_run() {
        let checker = Arc::new(CountingChecker {
            calls: AtomicUsize::new(0),
        });
        let corrector = LibraryCorrector::new(checker.clone());
        let words = matrix(&[&["caza"]]);

        corrector.correct_all(&words).unwrap();
        corrector.correct_all(&words).unwrap();
        assert_eq!(checker.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_library_corrector_reports_checker_failure() {
        let corrector = LibraryCorrector::new(Arc::new(FailingChecker));
        let result = corrector.correct_all(&matrix(&[&["caza"]]));
        assert!(matches!(result, Err(EscribaError::Correction(_))));
        assert_eq!(corrector.checker_name(), "failing");
    }
}
