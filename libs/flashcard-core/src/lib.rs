//! Core card-building library used by the easy-anki CLI.
//!
//! Provides:
//! - Input table reader (comma-separated words or word/translation rows)
//! - WordTranslationSet, the validated english/translation record
//! - Media destination planning and already-present filtering
//! - Reconciliation of per-word media failures
//! - Anki import row formatting and the import-file dialect

pub mod error;
pub mod format;
pub mod language;
pub mod media;
pub mod parser;
pub mod reconcile;
pub mod types;
pub mod word_set;

pub use error::{PipelineError, Result};
pub use format::{make_rows, ImportDialect};
pub use language::{strip_diacritics, LatinScriptClassifier, WordClassifier};
pub use media::{check_file_name_word, compute_targets, filter_existing, FilenameTemplate, MediaFileMap, TargetMap};
pub use parser::{detect_layout, read_table, single_words, InputLayout};
pub use reconcile::{reconcile, verify_media_present, FetchFailures};
pub use types::{DropReason, DroppedWord, Entry, OutputRow, RowSchema, DEFAULT_FIELD_COUNT};
pub use word_set::WordTranslationSet;
