//! Bounded edit-distance candidate generation.
//!
//! A distance-1 edit is a deletion, an adjacent transposition, a replacement
//! with any alphabet letter or an insertion of any alphabet letter. Larger
//! distances are reached by applying distance-1 generation to the previous
//! frontier, accumulating the union, so a variant reported at distance `n`
//! may also be reachable with fewer edits. Each variant is tagged with the
//! first distance at which it was produced.

use ahash::{AHashMap, AHashSet};

use crate::config::DEFAULT_ALPHABET;

/// Generates edit variants of a word over a fixed alphabet.
#[derive(Debug, Clone)]
pub struct EditGenerator {
    alphabet: Vec<char>,
}

impl EditGenerator {
    /// Create a generator over the letters of `alphabet` (duplicates removed).
    pub fn new(alphabet: &str) -> Self {
        let mut letters: Vec<char> = Vec::new();
        for c in alphabet.chars() {
            if !letters.contains(&c) {
                letters.push(c);
            }
        }
        EditGenerator { alphabet: letters }
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Call `f` with every distance-1 edit of `word`, duplicates included.
    ///
    /// Edits are produced in a fixed order: deletions, transpositions,
    /// replacements, insertions. The `&str` passed to `f` is only valid for
    /// the duration of the call.
    pub fn for_each_edit<F: FnMut(&str)>(&self, word: &str, mut f: F) {
        let chars: Vec<char> = word.chars().collect();
        let mut buf = String::with_capacity(word.len() + 4);
        self.edits_into(&chars, &mut buf, &mut f);
    }

    fn edits_into<F: FnMut(&str)>(&self, chars: &[char], buf: &mut String, f: &mut F) {
        let len = chars.len();

        // Deletions
        for i in 0..len {
            buf.clear();
            buf.extend(&chars[..i]);
            buf.extend(&chars[i + 1..]);
            f(buf.as_str());
        }

        // Transpositions
        for i in 0..len.saturating_sub(1) {
            buf.clear();
            buf.extend(&chars[..i]);
            buf.push(chars[i + 1]);
            buf.push(chars[i]);
            buf.extend(&chars[i + 2..]);
            f(buf.as_str());
        }

        // Replacements, including a letter with itself
        for i in 0..len {
            for &c in &self.alphabet {
                buf.clear();
                buf.extend(&chars[..i]);
                buf.push(c);
                buf.extend(&chars[i + 1..]);
                f(buf.as_str());
            }
        }

        // Insertions
        for i in 0..=len {
            for &c in &self.alphabet {
                buf.clear();
                buf.extend(&chars[..i]);
                buf.push(c);
                buf.extend(&chars[i..]);
                f(buf.as_str());
            }
        }
    }

    /// All distance-1 edits before deduplication.
    pub fn edits1_raw(&self, word: &str) -> Vec<String> {
        let mut edits = Vec::new();
        self.for_each_edit(word, |edit| edits.push(edit.to_string()));
        edits
    }

    /// Distinct distance-1 edits.
    pub fn edits1(&self, word: &str) -> AHashSet<String> {
        let mut edits = AHashSet::new();
        self.for_each_edit(word, |edit| {
            if !edits.contains(edit) {
                edits.insert(edit.to_string());
            }
        });
        edits
    }

    /// Union of the edits reachable by up to `n` rounds of distance-1 generation.
    pub fn edits_up_to(&self, word: &str, n: usize) -> AHashSet<String> {
        let mut edits = AHashSet::new();
        self.for_each_variant(word, n, |variant, _| {
            if !edits.contains(variant) {
                edits.insert(variant.to_string());
            }
        });
        edits
    }

    /// The word and every variant up to `max_distance`, each tagged with the
    /// smallest distance it was produced at. The word itself is at distance 0.
    pub fn candidates(&self, word: &str, max_distance: usize) -> AHashMap<String, usize> {
        let mut candidates = AHashMap::new();
        candidates.insert(word.to_string(), 0);
        self.for_each_variant(word, max_distance, |variant, distance| {
            if !candidates.contains_key(variant) {
                candidates.insert(variant.to_string(), distance);
            }
        });
        candidates
    }

    /// Stream every variant of `word` up to `max_distance` with the round
    /// that produced it.
    ///
    /// Variants can be reported more than once; a repeat never carries a
    /// smaller distance than the first report. Only intermediate rounds are
    /// materialized, the last round is streamed through a reused buffer.
    pub fn for_each_variant<F: FnMut(&str, usize)>(
        &self,
        word: &str,
        max_distance: usize,
        mut f: F,
    ) {
        if max_distance == 0 {
            return;
        }

        let mut seen: AHashSet<String> = AHashSet::new();
        seen.insert(word.to_string());
        let mut frontier: Vec<String> = vec![word.to_string()];
        let mut buf = String::with_capacity(word.len() + max_distance + 4);
        // The word is its own identity replacement but is never expanded twice.
        let mut word_reported = false;

        for distance in 1..=max_distance {
            let last = distance == max_distance;
            let mut next = Vec::new();

            for current in &frontier {
                let chars: Vec<char> = current.chars().collect();
                self.edits_into(&chars, &mut buf, &mut |edit: &str| {
                    if last {
                        f(edit, distance);
                    } else if !seen.contains(edit) {
                        seen.insert(edit.to_string());
                        next.push(edit.to_string());
                        f(edit, distance);
                    } else if !word_reported && edit == word {
                        word_reported = true;
                        f(edit, distance);
                    }
                });
            }

            frontier = next;
        }
    }
}

impl Default for EditGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHABET)
    }
}
