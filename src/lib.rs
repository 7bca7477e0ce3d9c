//! # Escriba
//!
//! Extracts free-form comment text from a web page and normalizes it through
//! a sequence of timed stages:
//!
//! 1. scraping the page,
//! 2. removing noise and isolating the target section,
//! 3. sentence tokenization,
//! 4. word tokenization,
//! 5. abbreviation expansion,
//! 6. spelling correction, by corpus frequency and by dictionary suggestion.
//!
//! Every run returns one [`StageResult`](pipeline::StageResult) per stage,
//! even when an earlier stage failed.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use escriba::config::PipelineConfig;
//! use escriba::pipeline::{Pipeline, PipelineRequest, Resources};
//!
//! # async fn example() -> escriba::error::Result<()> {
//! let config = PipelineConfig::default();
//! let resources = Arc::new(Resources::load(&config.resources)?);
//! let pipeline = Pipeline::new(config, resources)?;
//!
//! let request = PipelineRequest::new("https://example.com/noticia", "comentarios", "div");
//! for stage in pipeline.run(&request).await {
//!     println!("{}: {} ms", stage.etapa, stage.tempo);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod spelling;
pub mod web;

pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::error::{EscribaError, Result};
    pub use crate::pipeline::{Pipeline, PipelineRequest, Resources, Stage, StageResult, StageValue};
    pub use crate::web::fetch::PageSource;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
