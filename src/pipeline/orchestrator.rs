//! The pipeline orchestrator.
//!
//! A run walks the stages in a fixed order, feeding each stage the previous
//! stage's output. A stage that fails records a placeholder output and an
//! `erro` annotation and the run carries on, so callers always receive the
//! full stage history. Only building a [`Pipeline`] can fail.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::sentence::{SentenceSegmenter, SentenceTokenizer};
use crate::analysis::tokenizer::{WhitespaceTokenizer, WordMatrix};
use crate::config::PipelineConfig;
use crate::error::{EscribaError, Result};
use crate::pipeline::resources::Resources;
use crate::pipeline::stage::{Stage, StageResult, StageValue, timed, timed_async};
use crate::spelling::corrector::{Corrector, FrequencyCorrector, LibraryCorrector, SpellChecker};
use crate::spelling::suggest::{SuggestionConfig, SuggestionEngine};
use crate::web::clean::NoiseRemover;
use crate::web::fetch::{HttpFetcher, PageSource};

/// What to fetch and which section of it to process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub url: String,
    /// Class or id of the element holding the comments.
    pub section: String,
    /// Tag name of that element.
    pub tag: String,
}

impl PipelineRequest {
    pub fn new(
        url: impl Into<String>,
        section: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        PipelineRequest {
            url: url.into(),
            section: section.into(),
            tag: tag.into(),
        }
    }
}

/// Text normalization pipeline.
///
/// Cloning is cheap; every clone shares the same resources.
#[derive(Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    resources: Arc<Resources>,
    source: Arc<dyn PageSource>,
    remover: NoiseRemover,
    sentences: Arc<SentenceTokenizer>,
    words: WhitespaceTokenizer,
    frequency: FrequencyCorrector,
    library: LibraryCorrector,
}

impl Pipeline {
    /// Build a pipeline fetching pages over HTTP.
    pub fn new(config: PipelineConfig, resources: Arc<Resources>) -> Result<Self> {
        config.validate()?;
        let source = Arc::new(HttpFetcher::new(&config.fetch)?);

        let suggestion_config = SuggestionConfig {
            max_distance: config.corrector.max_distance,
            alphabet: config.corrector.alphabet.clone(),
            max_word_len: config.corrector.max_word_len,
            ..Default::default()
        };
        let checker = Arc::new(SuggestionEngine::with_config(
            resources.dictionary(),
            suggestion_config,
        ));

        let pipeline = Pipeline {
            remover: NoiseRemover::new(config.clean.clone()),
            sentences: Arc::new(SentenceTokenizer::default()),
            words: WhitespaceTokenizer::new(),
            frequency: FrequencyCorrector::with_config(resources.frequency(), &config.corrector),
            library: LibraryCorrector::new(checker).with_parallel(config.corrector.parallel),
            source,
            resources,
            config,
        };
        info!(
            "Pipeline ready: strategy {:?}, max distance {}, segmenter {}",
            pipeline.config.corrector.strategy,
            pipeline.config.corrector.max_distance,
            pipeline.sentences.segmenter_name()
        );
        Ok(pipeline)
    }

    /// Replace the page source.
    pub fn with_source(mut self, source: Arc<dyn PageSource>) -> Self {
        self.source = source;
        self
    }

    /// Replace the sentence segmenter.
    pub fn with_segmenter(mut self, segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        self.sentences = Arc::new(SentenceTokenizer::new(segmenter));
        self
    }

    /// Replace the spell checker used by the library correction stage.
    pub fn with_checker(mut self, checker: Arc<dyn SpellChecker>) -> Self {
        self.library =
            LibraryCorrector::new(checker).with_parallel(self.config.corrector.parallel);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Stages a run produces, in order.
    pub fn stages(&self) -> Vec<Stage> {
        let strategy = self.config.corrector.strategy;
        Stage::ALL
            .into_iter()
            .filter(|stage| match stage {
                Stage::SpellingCorrection => strategy.uses_frequency(),
                Stage::SpellingCorrectionLibrary => strategy.uses_library(),
                _ => true,
            })
            .collect()
    }

    /// Fetch the page and run every stage.
    ///
    /// Only the fetch is awaited on the caller's task; the remaining stages
    /// run on the blocking pool.
    pub async fn run(&self, request: &PipelineRequest) -> Vec<StageResult> {
        let (fetched, tempo) = timed_async(self.source.fetch(&request.url)).await;
        let (content, error) = match fetched {
            Ok(Some(body)) => (Some(body), None),
            Ok(None) => (
                None,
                Some(EscribaError::fetch(format!("no content from {}", request.url))),
            ),
            Err(e) => {
                warn!("Fetching {} failed: {}", request.url, e);
                (None, Some(e))
            }
        };

        let mut scraping = StageResult::new(
            Stage::Scraping,
            StageValue::Text(request.url.clone()),
            StageValue::from(content.clone()),
            tempo,
        );
        if let Some(e) = error {
            scraping = scraping.with_error(e);
        }
        debug!("Stage '{}' finished in {} ms", Stage::Scraping, tempo);

        let pipeline = self.clone();
        let owned_request = request.clone();
        let rest = tokio::task::spawn_blocking(move || {
            pipeline.process_fetched(&owned_request, content.as_deref())
        })
        .await;

        let mut results = vec![scraping];
        match rest {
            Ok(stages) => results.extend(stages),
            Err(e) => {
                warn!("Processing {} aborted: {}", request.url, e);
                results.extend(self.placeholders(EscribaError::other(e.to_string())));
            }
        }
        results
    }

    /// Run every stage on markup that was already retrieved.
    ///
    /// The scraping record takes `request.url` as its input and `content` as
    /// its output, with no elapsed time.
    pub fn process(&self, request: &PipelineRequest, content: Option<String>) -> Vec<StageResult> {
        let mut scraping = StageResult::new(
            Stage::Scraping,
            StageValue::Text(request.url.clone()),
            StageValue::from(content.clone()),
            0.0,
        );
        if content.is_none() {
            scraping = scraping.with_error(EscribaError::fetch("no content"));
        }

        let mut results = vec![scraping];
        results.extend(self.process_fetched(request, content.as_deref()));
        results
    }

    /// Every stage after scraping.
    fn process_fetched(&self, request: &PipelineRequest, content: Option<&str>) -> Vec<StageResult> {
        let mut results = Vec::with_capacity(Stage::ALL.len() - 1);

        let mut missed_section = None;
        let (text, mut cleaned) = run_stage(
            Stage::NoiseRemoval,
            StageValue::from(content.map(str::to_string)),
            String::new(),
            || {
                let markup = content.ok_or_else(|| EscribaError::fetch("no page content to clean"))?;
                let output = self.remover.clean(markup, &request.tag, &request.section);
                missed_section = output.missing_section(&request.tag, &request.section);
                Ok(output.text)
            },
        );
        if let Some(e) = missed_section {
            cleaned = cleaned.with_error(e);
        }
        results.push(cleaned);

        let (sentences, result) = run_stage(
            Stage::SentenceTokenization,
            StageValue::Text(text.clone()),
            Vec::new(),
            || self.sentences.split_sentences(&text),
        );
        results.push(result);

        let (words, result) = run_stage(
            Stage::WordTokenization,
            StageValue::Sentences(sentences.clone()),
            WordMatrix::new(),
            || Ok(self.words.split_words(&sentences)),
        );
        results.push(result);

        let (expanded, result) = run_stage(
            Stage::AbbreviationExpansion,
            StageValue::Words(words.clone()),
            words.clone(),
            || Ok(self.resources.expansions().expand_all(&words)),
        );
        results.push(result);

        let strategy = self.config.corrector.strategy;
        let correctors: [(Stage, bool, &dyn Corrector); 2] = [
            (
                Stage::SpellingCorrection,
                strategy.uses_frequency(),
                &self.frequency,
            ),
            (
                Stage::SpellingCorrectionLibrary,
                strategy.uses_library(),
                &self.library,
            ),
        ];
        for (stage, enabled, corrector) in correctors {
            if !enabled {
                continue;
            }
            // A failed corrector reports the uncorrected words
            let (_, result) = run_stage(
                stage,
                StageValue::Words(expanded.clone()),
                expanded.clone(),
                || corrector.correct_all(&expanded),
            );
            results.push(result);
        }

        results
    }

    /// Records for every stage after scraping, all carrying `error`.
    fn placeholders(&self, error: EscribaError) -> Vec<StageResult> {
        let message = error.to_string();
        self.stages()
            .into_iter()
            .filter(|stage| *stage != Stage::Scraping)
            .map(|stage| {
                let empty = match stage {
                    Stage::NoiseRemoval => StageValue::Text(String::new()),
                    Stage::SentenceTokenization => StageValue::Sentences(Vec::new()),
                    _ => StageValue::Words(WordMatrix::new()),
                };
                StageResult::new(stage, StageValue::Missing, empty, 0.0).with_error(&message)
            })
            .collect()
    }
}

/// Time `f` as `stage`. On error the stage reports `fallback` and the error.
fn run_stage<T, F>(stage: Stage, entrada: StageValue, fallback: T, f: F) -> (T, StageResult)
where
    T: Clone + Into<StageValue>,
    F: FnOnce() -> Result<T>,
{
    let (outcome, tempo) = timed(f);
    debug!("Stage '{}' finished in {} ms", stage, tempo);

    match outcome {
        Ok(value) => {
            let result = StageResult::new(stage, entrada, value.clone().into(), tempo);
            (value, result)
        }
        Err(e) => {
            warn!("Stage '{}' failed: {}", stage, e);
            let result =
                StageResult::new(stage, entrada, fallback.clone().into(), tempo).with_error(e);
            (fallback, result)
        }
    }
}
