//! Command line argument parsing for the Escriba CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{CorrectionStrategy, PipelineConfig, SectionFallback};

/// Escriba - comment text normalization and spelling correction
#[derive(Parser, Debug, Clone)]
#[command(name = "escriba")]
#[command(about = "Extracts comment text from a web page and normalizes it stage by stage")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct EscribaArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Pipeline configuration file (JSON)
    #[arg(short, long, value_name = "FILE", env = "ESCRIBA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "json", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl EscribaArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch a page and run the whole pipeline
    Run(RunArgs),

    /// Run the pipeline on a local HTML file
    #[command(name = "process-file")]
    ProcessFile(ProcessFileArgs),

    /// Correct individual words
    Correct(CorrectArgs),

    /// Show name and version
    Version,
}

/// Which part of a page to process.
#[derive(Args, Debug, Clone)]
pub struct SectionArgs {
    /// Tag name of the element holding the comments
    #[arg(short, long, default_value = "div")]
    pub tag: String,

    /// Class or id of that element
    #[arg(short, long)]
    pub section: String,
}

/// Settings that override the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineOverrides {
    /// Correction stages to run
    #[arg(long)]
    pub strategy: Option<StrategyArg>,

    /// Maximum edit distance for correction candidates
    #[arg(long, value_name = "N")]
    pub max_distance: Option<usize>,

    /// What to return when the section is not found
    #[arg(long)]
    pub fallback: Option<FallbackArg>,

    /// Correct words on a single thread
    #[arg(long)]
    pub sequential: bool,
}

impl PipelineOverrides {
    /// Apply the overrides that were given.
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(strategy) = self.strategy {
            config.corrector.strategy = strategy.into();
        }
        if let Some(max_distance) = self.max_distance {
            config.corrector.max_distance = max_distance;
        }
        if let Some(fallback) = self.fallback {
            config.clean.fallback = fallback.into();
        }
        if self.sequential {
            config.corrector.parallel = false;
        }
    }
}

/// Arguments for fetching and processing a page
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Page URL
    #[arg(short, long, required_unless_present = "request")]
    pub url: Option<String>,

    /// Tag name of the element holding the comments
    #[arg(short, long, default_value = "div")]
    pub tag: String,

    /// Class or id of that element
    #[arg(short, long, required_unless_present = "request")]
    pub section: Option<String>,

    /// Read `{url, section, tag}` from a JSON file instead
    #[arg(long, value_name = "FILE", conflicts_with_all = ["url", "section"])]
    pub request: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub overrides: PipelineOverrides,
}

/// Arguments for processing a local file
#[derive(Parser, Debug, Clone)]
pub struct ProcessFileArgs {
    /// HTML file to process
    #[arg(value_name = "HTML")]
    pub file: PathBuf,

    #[command(flatten)]
    pub section: SectionArgs,

    #[command(flatten)]
    pub overrides: PipelineOverrides,
}

/// Arguments for correcting words
#[derive(Parser, Debug, Clone)]
pub struct CorrectArgs {
    /// Words to correct
    #[arg(value_name = "WORD", required = true)]
    pub words: Vec<String>,

    /// Maximum edit distance for correction candidates
    #[arg(long, value_name = "N")]
    pub max_distance: Option<usize>,

    /// Number of ranked library suggestions to show per word
    #[arg(long, default_value = "3")]
    pub suggestions: usize,
}

/// Correction strategies available in CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// Frequency-ranked edit-distance candidates
    Frequency,
    /// Dictionary suggestion engine
    Library,
    /// Both stages
    Both,
}

impl From<StrategyArg> for CorrectionStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Frequency => CorrectionStrategy::Frequency,
            StrategyArg::Library => CorrectionStrategy::Library,
            StrategyArg::Both => CorrectionStrategy::Both,
        }
    }
}

/// Section fallback policies available in CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackArg {
    /// Use the text of the whole document
    Document,
    /// Return the sentinel message
    Sentinel,
}

impl From<FallbackArg> for SectionFallback {
    fn from(fallback: FallbackArg) -> Self {
        match fallback {
            FallbackArg::Document => SectionFallback::DocumentText,
            FallbackArg::Sentinel => SectionFallback::Sentinel,
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
