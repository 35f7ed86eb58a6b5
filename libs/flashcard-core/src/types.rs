//! Core types for the card pipeline.

use crate::error::{PipelineError, Result};
use serde::Serialize;

/// Number of positional fields in an input row: english, translation and one
/// extra-info field (the translation with diacritics).
pub const DEFAULT_FIELD_COUNT: usize = 3;

/// One candidate flashcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub english: String,
    pub translation: String,
    pub extra_info: Vec<String>,
}

impl Entry {
    pub fn new(english: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            translation: translation.into(),
            extra_info: Vec::new(),
        }
    }

    pub fn with_extra_info(mut self, extra_info: Vec<String>) -> Self {
        self.extra_info = extra_info;
        self
    }

    /// Whether any extra-info field carries text.
    pub fn has_extra_info(&self) -> bool {
        self.extra_info.iter().any(|field| !field.is_empty())
    }
}

/// Positional layout of input rows.
///
/// Only built through [`RowSchema::new`] or `Default`, so english and
/// translation always sit at distinct positions inside the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSchema {
    english_index: usize,
    translation_index: usize,
    field_count: usize,
}

impl Default for RowSchema {
    fn default() -> Self {
        Self {
            english_index: 0,
            translation_index: 1,
            field_count: DEFAULT_FIELD_COUNT,
        }
    }
}

impl RowSchema {
    pub fn new(english_index: usize, translation_index: usize, field_count: usize) -> Result<Self> {
        if english_index == translation_index {
            return Err(PipelineError::InvalidSchema(format!(
                "english and translation share index {english_index}"
            )));
        }
        if english_index >= field_count || translation_index >= field_count {
            return Err(PipelineError::InvalidSchema(format!(
                "indices {english_index} and {translation_index} must be below the field count {field_count}"
            )));
        }
        Ok(Self {
            english_index,
            translation_index,
            field_count,
        })
    }

    pub fn english_index(&self) -> usize {
        self.english_index
    }

    pub fn translation_index(&self) -> usize {
        self.translation_index
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// Positions holding extra info, in ascending order.
    pub fn extra_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.field_count).filter(move |&i| i != self.english_index && i != self.translation_index)
    }
}

/// One line of the import file: image tag, translation, sound tag, english,
/// then any extra-info fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    pub image_ref: String,
    pub translation: String,
    pub audio_ref: String,
    pub english: String,
    pub extra: Vec<String>,
}

impl OutputRow {
    /// Fields in write order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        [
            self.image_ref.as_str(),
            self.translation.as_str(),
            self.audio_ref.as_str(),
            self.english.as_str(),
        ]
        .into_iter()
        .chain(self.extra.iter().map(String::as_str))
    }

    pub fn field_count(&self) -> usize {
        4 + self.extra.len()
    }
}

/// Why a word was dropped from the card set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    NoImage,
    NoAudio,
    NoImageOrAudio,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoImage => "no image",
            Self::NoAudio => "no audio",
            Self::NoImageOrAudio => "no image and no audio",
        }
    }
}

/// A word removed during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedWord {
    pub english: String,
    pub translation: String,
    pub reason: DropReason,
}
