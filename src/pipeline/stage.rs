//! Stage records and timing.
//!
//! Every stage of a run produces one [`StageResult`]. Records serialize with
//! the keys `entrada`, `saida`, `tempo` and `etapa`, plus `erro` when the
//! stage had to fall back to a placeholder output.

use std::fmt;
use std::future::Future;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::WordMatrix;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "Raspagem")]
    Scraping,
    #[serde(rename = "Remoção de ruído")]
    NoiseRemoval,
    #[serde(rename = "Tokenização por frases")]
    SentenceTokenization,
    #[serde(rename = "Tokenização por palavras")]
    WordTokenization,
    #[serde(rename = "Expansão de siglas e abreviaturas")]
    AbbreviationExpansion,
    #[serde(rename = "Correção de caracteres incorretos sem biblioteca")]
    SpellingCorrection,
    #[serde(rename = "Correção de caracteres incorretos com biblioteca")]
    SpellingCorrectionLibrary,
}

impl Stage {
    /// All stages, in pipeline order.
    pub const ALL: [Stage; 7] = [
        Stage::Scraping,
        Stage::NoiseRemoval,
        Stage::SentenceTokenization,
        Stage::WordTokenization,
        Stage::AbbreviationExpansion,
        Stage::SpellingCorrection,
        Stage::SpellingCorrectionLibrary,
    ];

    /// Label reported in the `etapa` field.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Scraping => "Raspagem",
            Stage::NoiseRemoval => "Remoção de ruído",
            Stage::SentenceTokenization => "Tokenização por frases",
            Stage::WordTokenization => "Tokenização por palavras",
            Stage::AbbreviationExpansion => "Expansão de siglas e abreviaturas",
            Stage::SpellingCorrection => "Correção de caracteres incorretos sem biblioteca",
            Stage::SpellingCorrectionLibrary => "Correção de caracteres incorretos com biblioteca",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Input or output of a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageValue {
    /// No value at all, e.g. the page could not be fetched.
    Missing,
    Text(String),
    Sentences(Vec<String>),
    Words(WordMatrix),
}

impl StageValue {
    /// Whether the value holds no content.
    pub fn is_empty(&self) -> bool {
        match self {
            StageValue::Missing => true,
            StageValue::Text(text) => text.is_empty(),
            StageValue::Sentences(sentences) => sentences.is_empty(),
            StageValue::Words(words) => words.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StageValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_sentences(&self) -> Option<&[String]> {
        match self {
            StageValue::Sentences(sentences) => Some(sentences),
            _ => None,
        }
    }

    pub fn as_words(&self) -> Option<&WordMatrix> {
        match self {
            StageValue::Words(words) => Some(words),
            _ => None,
        }
    }
}

impl From<String> for StageValue {
    fn from(text: String) -> Self {
        StageValue::Text(text)
    }
}

impl From<Option<String>> for StageValue {
    fn from(text: Option<String>) -> Self {
        text.map_or(StageValue::Missing, StageValue::Text)
    }
}

impl From<Vec<String>> for StageValue {
    fn from(sentences: Vec<String>) -> Self {
        StageValue::Sentences(sentences)
    }
}

impl From<WordMatrix> for StageValue {
    fn from(words: WordMatrix) -> Self {
        StageValue::Words(words)
    }
}

/// The record of one executed stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    /// What the stage consumed.
    pub entrada: StageValue,
    /// What the stage produced, or its placeholder on failure.
    pub saida: StageValue,
    /// Wall-clock time in milliseconds, rounded to two decimals.
    pub tempo: f64,
    pub etapa: Stage,
    /// Why the output is a placeholder, when it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erro: Option<String>,
}

impl StageResult {
    pub fn new(stage: Stage, entrada: StageValue, saida: StageValue, tempo: f64) -> Self {
        StageResult {
            entrada,
            saida,
            tempo,
            etapa: stage,
            erro: None,
        }
    }

    /// Attach a failure annotation.
    pub fn with_error<E: fmt::Display>(mut self, error: E) -> Self {
        self.erro = Some(error.to_string());
        self
    }

    pub fn stage(&self) -> Stage {
        self.etapa
    }

    pub fn is_degraded(&self) -> bool {
        self.erro.is_some()
    }
}

/// Elapsed milliseconds since `start`, rounded to two decimals.
pub fn elapsed_ms(start: Instant) -> f64 {
    (start.elapsed().as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}

/// Run `f` and return its result with the elapsed time in milliseconds.
pub fn timed<T, F: FnOnce() -> T>(f: F) -> (T, f64) {
    let start = Instant::now();
    let value = f();
    (value, elapsed_ms(start))
}

/// Await `future` and return its output with the elapsed time in milliseconds.
pub async fn timed_async<F: Future>(future: F) -> (F::Output, f64) {
    let start = Instant::now();
    let value = future.await;
    (value, elapsed_ms(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_stage_labels_round_trip_through_serde() {
        for stage in Stage::ALL {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.label()));
            let back: Stage = serde_json::from_str(&json).unwrap();
            assert_eq!(back, stage);
        }
    }

    #[test]
    fn test_stage_result_json_shape() {
        let result = StageResult::new(
            Stage::WordTokenization,
            StageValue::Sentences(vec!["vc viu".to_string()]),
            StageValue::Words(vec![vec!["vc".to_string(), "viu".to_string()]]),
            1.5,
        );
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["entrada"], serde_json::json!(["vc viu"]));
        assert_eq!(json["saida"], serde_json::json!([["vc", "viu"]]));
        assert_eq!(json["tempo"], serde_json::json!(1.5));
        assert_eq!(json["etapa"], serde_json::json!("Tokenização por palavras"));
        assert!(json.get("erro").is_none());
    }

    #[test]
    fn test_missing_value_is_null() {
        let result = StageResult::new(
            Stage::Scraping,
            StageValue::Text("https://example.com".to_string()),
            StageValue::Missing,
            0.0,
        )
        .with_error("status 404");
        let json = serde_json::to_value(&result).unwrap();

        assert!(json["saida"].is_null());
        assert_eq!(json["erro"], serde_json::json!("status 404"));
        assert!(result.is_degraded());
    }

    #[test]
    fn test_stage_value_emptiness() {
        assert!(StageValue::Missing.is_empty());
        assert!(StageValue::from(String::new()).is_empty());
        assert!(StageValue::from(Vec::<String>::new()).is_empty());
        assert!(!StageValue::from(vec![vec!["a".to_string()]]).is_empty());
        assert_eq!(StageValue::from(None::<String>), StageValue::Missing);
    }

    #[test]
    fn test_timed_rounds_to_two_decimals() {
        let (value, tempo) = timed(|| {
            std::thread::sleep(Duration::from_millis(5));
            42
        });
        assert_eq!(value, 42);
        assert!(tempo >= 5.0);
        assert_eq!((tempo * 100.0).round() / 100.0, tempo);
    }

    #[tokio::test]
    async fn test_timed_async() {
        let (value, tempo) = timed_async(async { "pronto" }).await;
        assert_eq!(value, "pronto");
        assert!(tempo >= 0.0);
    }
}
