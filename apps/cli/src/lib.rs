//! easy-anki: build Anki flashcards with images and native-speaker audio.
//!
//! Reads a word table, translates bare words, fetches or copies one image
//! and one pronunciation per word, drops words whose media could not be
//! obtained and writes an Anki import file.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod report;

pub use config::{Args, Credentials, MediaSource, RunConfig};
pub use error::{AppError, ConfigError, ProviderError, Result};
pub use pipeline::{run, Collaborators};
pub use report::RunSummary;
