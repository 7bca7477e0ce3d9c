//! Read-only resources shared by every run.

use std::sync::Arc;

use log::info;

use crate::analysis::expansion::ExpansionDictionary;
use crate::config::ResourceConfig;
use crate::error::Result;
use crate::spelling::dictionary::SpellingDictionary;
use crate::spelling::frequency::FrequencyModel;

/// Expansion dictionary, frequency model and spelling dictionary.
///
/// Built once, then shared behind an [`Arc`] and never mutated.
#[derive(Debug, Clone)]
pub struct Resources {
    expansions: Arc<ExpansionDictionary>,
    frequency: Arc<FrequencyModel>,
    dictionary: Arc<SpellingDictionary>,
}

impl Resources {
    /// Load every resource named by `config`.
    ///
    /// Any unreadable or malformed resource is a configuration error. The
    /// spelling dictionary is derived from the frequency model unless a
    /// dictionary file is configured.
    pub fn load(config: &ResourceConfig) -> Result<Self> {
        let expansions = ExpansionDictionary::load(&config.expansion_dictionary)?;
        let frequency = FrequencyModel::load_corpus(&config.corpus, config.corpus_format)?;
        let dictionary = match &config.spelling_dictionary {
            Some(path) => SpellingDictionary::load_from_frequency_file(path)?,
            None => SpellingDictionary::from_frequency_model(&frequency),
        };

        let resources = Self::from_parts(expansions, frequency, dictionary);
        info!(
            "resources ready: {} expansions, {} corpus words ({} tokens), {} dictionary words",
            resources.expansions.len(),
            resources.frequency.len(),
            resources.frequency.total(),
            resources.dictionary.word_count()
        );
        Ok(resources)
    }

    pub fn from_parts(
        expansions: ExpansionDictionary,
        frequency: FrequencyModel,
        dictionary: SpellingDictionary,
    ) -> Self {
        Resources {
            expansions: Arc::new(expansions),
            frequency: Arc::new(frequency),
            dictionary: Arc::new(dictionary),
        }
    }

    /// Resources whose spelling dictionary is derived from `frequency`.
    pub fn from_model(expansions: ExpansionDictionary, frequency: FrequencyModel) -> Self {
        let dictionary = SpellingDictionary::from_frequency_model(&frequency);
        Self::from_parts(expansions, frequency, dictionary)
    }

    pub fn expansions(&self) -> &ExpansionDictionary {
        &self.expansions
    }

    pub fn frequency(&self) -> Arc<FrequencyModel> {
        Arc::clone(&self.frequency)
    }

    pub fn dictionary(&self) -> Arc<SpellingDictionary> {
        Arc::clone(&self.dictionary)
    }
}
