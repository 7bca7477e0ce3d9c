//! Pipeline configuration.
//!
//! Every knob has a default, so an empty JSON object is a valid
//! configuration. Values loaded from a file can be overridden by the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EscribaError, Result};

/// Letters used by the candidate generator when no alphabet is configured.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Words longer than this many characters are left uncorrected.
pub const DEFAULT_MAX_WORD_LEN: usize = 30;

/// Default text returned when the section is missing and the sentinel policy is active.
pub const DEFAULT_SENTINEL: &str = "section not found";

/// Top-level configuration for a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub fetch: FetchConfig,
    pub clean: CleanConfig,
    pub corrector: CorrectorConfig,
    pub resources: ResourceConfig,
}

impl PipelineConfig {
    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EscribaError::config(format!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: PipelineConfig = serde_json::from_str(&content).map_err(|e| {
            EscribaError::config(format!(
                "Failed to parse configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout_secs == 0 {
            return Err(EscribaError::config("fetch timeout must be positive"));
        }
        if self.corrector.max_distance == 0 {
            return Err(EscribaError::config("max_distance must be at least 1"));
        }
        if self.corrector.alphabet.chars().next().is_none() {
            return Err(EscribaError::config("alphabet must not be empty"));
        }
        if self.corrector.max_word_len == 0 {
            return Err(EscribaError::config("max_word_len must be at least 1"));
        }
        Ok(())
    }
}

/// Configuration for the page fetcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent header sent with the request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout_secs: 30,
            user_agent: format!("escriba/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// What the noise remover returns when the target section is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionFallback {
    /// Extract text from the whole remaining document.
    #[default]
    DocumentText,
    /// Return the configured sentinel string.
    Sentinel,
}

/// Configuration for the noise remover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    pub fallback: SectionFallback,
    pub sentinel: String,
}

impl Default for CleanConfig {
    fn default() -> Self {
        CleanConfig {
            fallback: SectionFallback::DocumentText,
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }
}

/// Which correction stages the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionStrategy {
    /// Frequency-ranked edit-distance candidates only.
    Frequency,
    /// Dictionary suggestion engine only.
    Library,
    /// Both, frequency stage first.
    #[default]
    Both,
}

impl CorrectionStrategy {
    pub fn uses_frequency(self) -> bool {
        matches!(self, CorrectionStrategy::Frequency | CorrectionStrategy::Both)
    }

    pub fn uses_library(self) -> bool {
        matches!(self, CorrectionStrategy::Library | CorrectionStrategy::Both)
    }
}

/// Configuration for the spelling correctors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectorConfig {
    /// Maximum edit distance for candidate generation.
    pub max_distance: usize,
    /// Letters used for replacements and insertions.
    pub alphabet: String,
    pub strategy: CorrectionStrategy,
    /// Correct words on the rayon pool.
    pub parallel: bool,
    /// Longest word, in characters, that is searched for corrections.
    /// Candidate generation grows with the square of the word length.
    pub max_word_len: usize,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        CorrectorConfig {
            max_distance: 2,
            alphabet: DEFAULT_ALPHABET.to_string(),
            strategy: CorrectionStrategy::Both,
            parallel: true,
            max_word_len: DEFAULT_MAX_WORD_LEN,
        }
    }
}

/// How corpus files are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusFormat {
    /// Running text.
    #[default]
    Plain,
    /// Whitespace-separated `word_TAG` tokens.
    Tagged,
}

/// Locations of the static resources loaded once at start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// JSON object mapping lowercase words to their replacements.
    pub expansion_dictionary: PathBuf,
    /// Corpus files or directories used to build the frequency model.
    pub corpus: Vec<PathBuf>,
    pub corpus_format: CorpusFormat,
    /// Optional `word frequency` list for the library corrector.
    pub spelling_dictionary: Option<PathBuf>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        ResourceConfig {
            expansion_dictionary: PathBuf::from("resources/words.json"),
            corpus: vec![PathBuf::from("resources/corpus")],
            corpus_format: CorpusFormat::Tagged,
            spelling_dictionary: None,
        }
    }
}
