//! Error handling for the easy-anki CLI

use std::path::PathBuf;

use flashcard_core::PipelineError;
use thiserror::Error;

/// Invalid or incomplete configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingCredential(&'static str),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("invalid option: {0}")]
    Invalid(String),
}

/// Errors from the translation, search, pronunciation and copy collaborators.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("no result for `{0}`")]
    NoResult(String),

    #[error("downloaded file from {0} was empty")]
    EmptyDownload(String),

    #[error("translation returned {actual} words for {expected} inputs")]
    TranslationCount { expected: usize, actual: usize },

    #[error("word `{word}` was expecting {kind} file {}, but it didn't exist", path.display())]
    MissingLocalMedia {
        word: String,
        kind: &'static str,
        path: PathBuf,
    },

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

/// Top-level error for a run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("failed to read {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize run report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, AppError>;
