//! Error type definitions for the EPG matcher
//!
//! Pattern errors never escape the matching layer: the validator captures
//! them into a `ValidationResult` and the extractor degrades to "no match".
//! `AppError` covers the ambient concerns around the engine (configuration
//! files, stream feeds, CLI input).

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// File system errors while reading configuration or stream feeds
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized (writing the default file)
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Malformed stream feed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Reasons a pattern is rejected by the validator.
///
/// These are rendered to strings for `ValidationResult::error`; the UI layer
/// surfaces the message verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    /// Empty or whitespace-only source text
    #[error("Pattern cannot be empty")]
    Empty,

    /// The host regex engine rejected the translated pattern
    #[error("Invalid regex: {message}")]
    Compile { message: String },

    /// Complexity score above the configured ceiling
    #[error("Pattern complexity score {score} exceeds limit of {limit}")]
    ComplexityExceeded { score: u32, limit: u32 },

    /// A bounded repetition such as `{0,500}` above the configured ceiling
    #[error("Repetition bound {bound} exceeds limit of {limit}")]
    RepetitionExceeded { bound: usize, limit: usize },
}

impl From<regex::Error> for PatternError {
    fn from(err: regex::Error) -> Self {
        Self::Compile {
            message: err.to_string(),
        }
    }
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
