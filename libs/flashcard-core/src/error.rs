//! Error types for flashcard-core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using PipelineError.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised by the card pipeline.
///
/// Every variant is fatal for the run. Per-word media misses are not errors;
/// they travel as failure sets into [`crate::reconcile`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unterminated quoted field starting at line {line}")]
    UnterminatedQuote { line: usize },

    #[error("malformed input at row {row}: expected a single word, got {fields:?}")]
    NotASingleWord { row: usize, fields: Vec<String> },

    #[error("row {row} {fields:?} had {actual} fields instead of the expected number: {expected}")]
    MalformedRow {
        row: usize,
        fields: Vec<String>,
        expected: usize,
        actual: usize,
    },

    #[error("invalid row schema: {0}")]
    InvalidSchema(String),

    #[error("`{0}` is duplicated in english words")]
    DuplicateEnglish(String),

    #[error("`{0}` is duplicated in translations")]
    DuplicateTranslation(String),

    #[error("no translation for english word `{0}`")]
    UnknownEnglish(String),

    #[error("no english word for translation `{0}`")]
    UnknownTranslation(String),

    #[error("tried to delete translated word `{0}`, but couldn't find it in the word list")]
    TranslationNotFound(String),

    #[error("{left} has {left_len} keys and {right} has {right_len} keys, but their key sets must be identical")]
    KeySetMismatch {
        left: &'static str,
        right: &'static str,
        left_len: usize,
        right_len: usize,
    },

    #[error("extra info has {extra_len} english words that are not all among the {english_len} english words of the word set")]
    ExtraInfoNotSubset { extra_len: usize, english_len: usize },

    #[error("filename template `{0}` must contain `{{word}}` exactly once and no path separators")]
    InvalidTemplate(String),

    #[error("`{0}` can't be used in a media file name")]
    UnsafeFileName(String),

    #[error("field {0:?} cannot be written without escaping the quote character")]
    UnwritableField(String),

    #[error("`{}` should have existed for `{key}`, but it doesn't", path.display())]
    MissingMedia { key: String, path: PathBuf },
}
