//! Spelling correction.
//!
//! [`frequency`] and [`edits`] implement the corpus-driven corrector,
//! [`dictionary`], [`levenshtein`] and [`suggest`] the dictionary-backed
//! [`SpellChecker`](corrector::SpellChecker), and [`corrector`] the
//! strategies that apply either one to a word matrix.

pub mod corrector;
pub mod dictionary;
pub mod edits;
pub mod frequency;
pub mod levenshtein;
pub mod suggest;
