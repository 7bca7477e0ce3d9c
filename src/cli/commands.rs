//! Command implementations for the Escriba CLI.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::PipelineConfig;
use crate::error::{EscribaError, Result};
use crate::pipeline::{Pipeline, PipelineRequest, Resources};
use crate::spelling::corrector::FrequencyCorrector;
use crate::spelling::suggest::{SuggestionConfig, SuggestionEngine};

/// Execute a CLI command.
pub async fn execute_command(args: EscribaArgs) -> Result<()> {
    match &args.command {
        Command::Run(run_args) => run_pipeline(run_args.clone(), &args).await,
        Command::ProcessFile(file_args) => process_file(file_args.clone(), &args),
        Command::Correct(correct_args) => correct_words(correct_args.clone(), &args),
        Command::Version => show_version(&args),
    }
}

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            PipelineConfig::load(path)
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn build_pipeline(config: PipelineConfig) -> Result<Pipeline> {
    config.validate()?;
    let resources = Arc::new(Resources::load(&config.resources)?);
    Pipeline::new(config, resources)
}

/// Fetch a page and run every stage.
async fn run_pipeline(args: RunArgs, cli_args: &EscribaArgs) -> Result<()> {
    let mut config = load_config(cli_args.config.as_deref())?;
    args.overrides.apply(&mut config);
    if let Some(timeout) = args.timeout {
        config.fetch.timeout_secs = timeout;
    }

    let request = match &args.request {
        Some(path) => read_request(path)?,
        None => match (&args.url, &args.section) {
            (Some(url), Some(section)) => PipelineRequest::new(url, section, &args.tag),
            _ => {
                return Err(EscribaError::config(
                    "either --request or both --url and --section are required",
                ));
            }
        },
    };

    let pipeline = build_pipeline(config)?;
    info!(
        "Processing <{}> '{}' from {}",
        request.tag, request.section, request.url
    );
    let results = pipeline.run(&request).await;
    output_stages(&results, cli_args)
}

/// Read a `{url, section, tag}` request from a JSON file.
pub fn read_request(path: &Path) -> Result<PipelineRequest> {
    let content = fs::read_to_string(path).map_err(|e| {
        EscribaError::config(format!("Failed to read request '{}': {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Run the pipeline on a local HTML file.
fn process_file(args: ProcessFileArgs, cli_args: &EscribaArgs) -> Result<()> {
    let mut config = load_config(cli_args.config.as_deref())?;
    args.overrides.apply(&mut config);

    let bytes = fs::read(&args.file)?;
    let content = String::from_utf8_lossy(&bytes).into_owned();

    let pipeline = build_pipeline(config)?;
    let request = PipelineRequest::new(
        args.file.display().to_string(),
        &args.section.section,
        &args.section.tag,
    );
    info!("Processing {} ({} bytes)", request.url, bytes.len());
    let results = pipeline.process(&request, Some(content));
    output_stages(&results, cli_args)
}

/// Correct individual words with both strategies.
fn correct_words(args: CorrectArgs, cli_args: &EscribaArgs) -> Result<()> {
    let mut config = load_config(cli_args.config.as_deref())?;
    if let Some(max_distance) = args.max_distance {
        config.corrector.max_distance = max_distance;
    }
    config.validate()?;

    let resources = Resources::load(&config.resources)?;
    let frequency = FrequencyCorrector::with_config(resources.frequency(), &config.corrector);
    let engine = SuggestionEngine::with_config(
        resources.dictionary(),
        SuggestionConfig {
            max_distance: config.corrector.max_distance,
            max_suggestions: args.suggestions.max(1),
            alphabet: config.corrector.alphabet.clone(),
            max_word_len: config.corrector.max_word_len,
            ..Default::default()
        },
    );

    let corrections: Vec<WordCorrection> = args
        .words
        .iter()
        .map(|word| {
            let word = resources.expansions().expand(word);
            let suggestions = engine.suggest(&word);
            WordCorrection {
                frequencia: frequency.correct(&word),
                biblioteca: suggestions.first().map(|s| s.word.clone()),
                sugestoes: suggestions
                    .into_iter()
                    .take(args.suggestions)
                    .map(|s| (s.word, (s.score * 1000.0).round() / 1000.0))
                    .collect(),
                palavra: word,
            }
        })
        .collect();

    output_result("Corrections", &corrections, cli_args)
}

fn show_version(cli_args: &EscribaArgs) -> Result<()> {
    let info = VersionInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: crate::VERSION.to_string(),
    };
    output_result("Version", &info, cli_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_default_config() {
        let config = load_config(None).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_missing_config_file() {
        let result = load_config(Some(Path::new("/nonexistent/escriba.json")));
        assert!(matches!(result, Err(EscribaError::Config(_))));
    }

    #[test]
    fn test_read_request() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pedido.json");
        fs::write(
            &path,
            r#"{"url": "https://example.com", "section": "comentarios", "tag": "div"}"#,
        )
        .unwrap();

        let request = read_request(&path).unwrap();
        assert_eq!(
            request,
            PipelineRequest::new("https://example.com", "comentarios", "div")
        );
    }

    #[test]
    fn test_read_malformed_request() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pedido.json");
        fs::write(&path, r#"{"url": "https://example.com"}"#).unwrap();

        assert!(matches!(read_request(&path), Err(EscribaError::Json(_))));
    }
}
