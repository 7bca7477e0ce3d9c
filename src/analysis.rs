//! Text analysis for the normalization pipeline.
//!
//! Sentence segmentation and cleaning, whitespace word tokenization and
//! abbreviation expansion. Char filters are the building blocks used to clean
//! sentence text.

pub mod char_filter;
pub mod expansion;
pub mod sentence;
pub mod tokenizer;
