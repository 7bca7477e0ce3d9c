//! Error types for Escriba.
//!
//! All fallible operations return [`EscribaError`]. The variants mirror the
//! pipeline's fault taxonomy: configuration problems are fatal at start-up,
//! everything else is caught at a stage boundary and reported alongside the
//! stage's placeholder output.
//!
//! # Examples
//!
//! ```
//! use escriba::error::{EscribaError, Result};
//!
//! fn load() -> Result<()> {
//!     Err(EscribaError::config("expansion dictionary is missing"))
//! }
//!
//! assert!(load().unwrap_err().is_fatal());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Escriba operations.
#[derive(Error, Debug)]
pub enum EscribaError {
    /// Unreadable or malformed configuration, dictionary or corpus.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The page could not be retrieved (network failure or non-2xx status).
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Neither the class nor the id match found the target section.
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    /// The sentence segmenter failed.
    #[error("Tokenization error: {0}")]
    Tokenization(String),

    /// A correction strategy's dependency misbehaved.
    #[error("Correction error: {0}")]
    Correction(String),

    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with EscribaError.
pub type Result<T> = std::result::Result<T, EscribaError>;

impl EscribaError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        EscribaError::Config(msg.into())
    }

    /// Create a new fetch error.
    pub fn fetch<S: Into<String>>(msg: S) -> Self {
        EscribaError::Fetch(msg.into())
    }

    /// Create a new section-not-found error.
    pub fn section_not_found<S: Into<String>>(msg: S) -> Self {
        EscribaError::SectionNotFound(msg.into())
    }

    /// Create a new tokenization error.
    pub fn tokenization<S: Into<String>>(msg: S) -> Self {
        EscribaError::Tokenization(msg.into())
    }

    /// Create a new correction error.
    pub fn correction<S: Into<String>>(msg: S) -> Self {
        EscribaError::Correction(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        EscribaError::Other(msg.into())
    }

    /// Whether this error must abort pipeline construction rather than be
    /// absorbed by a stage.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EscribaError::Config(_) | EscribaError::Io(_) | EscribaError::Json(_)
        )
    }
}
