//! The canonical record of flashcard candidates.
//!
//! A [`WordTranslationSet`] owns an ordered list of [`Entry`] values plus two
//! derived indices (`english -> position` and `translation -> position`).
//! The indices are private and rebuilt after every removal, so the
//! english/translation mapping is always a bijection over the live entries.
//!
//! # Row arity
//! Rows are read against a [`RowSchema`]. A row with exactly two fields is
//! padded to the schema width with empty strings (english and translation keep
//! their schema positions). Every other width mismatch is rejected with
//! [`PipelineError::MalformedRow`]. Rows already at full width pass through
//! untouched.
//!
//! # Keys
//! English words and translations name media files, so each must be usable
//! as part of a single file name (see [`check_file_name_word`]).

use crate::error::{PipelineError, Result};
use crate::media::check_file_name_word;
use crate::types::{Entry, RowSchema};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
pub struct WordTranslationSet {
    entries: Vec<Entry>,
    by_english: HashMap<String, usize>,
    by_translation: HashMap<String, usize>,
}

impl WordTranslationSet {
    /// Build a set from positional rows, validating arity and uniqueness.
    pub fn build<R, S>(rows: R, schema: RowSchema) -> Result<Self>
    where
        R: IntoIterator,
        R::Item: AsRef<[S]>,
        S: AsRef<str>,
    {
        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| {
                let fields: Vec<String> = row.as_ref().iter().map(|f| f.as_ref().to_string()).collect();
                let fields = normalize_row(fields, idx + 1, &schema)?;
                Ok(entry_from_row(fields, &schema))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_entries(entries)
    }

    /// Build a set from already-shaped entries.
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self> {
        let mut set = Self {
            entries,
            by_english: HashMap::new(),
            by_translation: HashMap::new(),
        };
        set.reindex()?;
        Ok(set)
    }

    fn reindex(&mut self) -> Result<()> {
        self.by_english.clear();
        self.by_translation.clear();

        for (idx, entry) in self.entries.iter().enumerate() {
            check_file_name_word(&entry.english)?;
            check_file_name_word(&entry.translation)?;
            if self.by_english.insert(entry.english.clone(), idx).is_some() {
                return Err(PipelineError::DuplicateEnglish(entry.english.clone()));
            }
            if self.by_translation.insert(entry.translation.clone(), idx).is_some() {
                return Err(PipelineError::DuplicateTranslation(entry.translation.clone()));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// English words in insertion order.
    pub fn english_words(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.english.as_str()).collect()
    }

    /// Translations in insertion order.
    pub fn translations(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.translation.as_str()).collect()
    }

    pub fn contains_english(&self, english: &str) -> bool {
        self.by_english.contains_key(english)
    }

    pub fn contains_translation(&self, translation: &str) -> bool {
        self.by_translation.contains_key(translation)
    }

    pub fn get_translation(&self, english: &str) -> Result<&str> {
        self.by_english
            .get(english)
            .map(|&idx| self.entries[idx].translation.as_str())
            .ok_or_else(|| PipelineError::UnknownEnglish(english.to_string()))
    }

    pub fn get_english(&self, translation: &str) -> Result<&str> {
        self.by_translation
            .get(translation)
            .map(|&idx| self.entries[idx].english.as_str())
            .ok_or_else(|| PipelineError::UnknownTranslation(translation.to_string()))
    }

    /// Extra info keyed by english word.
    ///
    /// Sparse: an entry whose extra fields are missing or all empty has no
    /// key here, which tells the formatter to append nothing for it.
    pub fn extra_info(&self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .iter()
            .filter(|e| e.has_extra_info())
            .map(|e| (e.english.clone(), e.extra_info.clone()))
            .collect()
    }

    /// Remove the entry whose translation matches, returning it.
    ///
    /// On error the set is left unchanged.
    pub fn remove_by_translation(&mut self, translation: &str) -> Result<Entry> {
        let idx = *self
            .by_translation
            .get(translation)
            .ok_or_else(|| PipelineError::TranslationNotFound(translation.to_string()))?;

        let removed = self.entries.remove(idx);
        self.by_english.remove(&removed.english);
        self.by_translation.remove(&removed.translation);
        // Positions after the removed entry shift down by one.
        for position in self.by_english.values_mut().chain(self.by_translation.values_mut()) {
            if *position > idx {
                *position -= 1;
            }
        }
        Ok(removed)
    }
}

impl<'a> IntoIterator for &'a WordTranslationSet {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn normalize_row(fields: Vec<String>, row: usize, schema: &RowSchema) -> Result<Vec<String>> {
    if fields.len() == schema.field_count() {
        return Ok(fields);
    }

    let fits_pair = schema.english_index() < 2 && schema.translation_index() < 2;
    if fields.len() == 2 && fits_pair {
        // Just a word and a translation: leave the rest empty.
        let mut padded = vec![String::new(); schema.field_count()];
        padded[schema.english_index()] = fields[schema.english_index()].clone();
        padded[schema.translation_index()] = fields[schema.translation_index()].clone();
        return Ok(padded);
    }

    Err(PipelineError::MalformedRow {
        row,
        actual: fields.len(),
        fields,
        expected: schema.field_count(),
    })
}

fn entry_from_row(mut fields: Vec<String>, schema: &RowSchema) -> Entry {
    let extra_info = schema
        .extra_indices()
        .map(|i| std::mem::take(&mut fields[i]))
        .collect();
    Entry {
        english: std::mem::take(&mut fields[schema.english_index()]),
        translation: std::mem::take(&mut fields[schema.translation_index()]),
        extra_info,
    }
}
