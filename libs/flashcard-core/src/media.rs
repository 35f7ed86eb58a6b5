//! Media destination planning.
//!
//! Each word gets one image path (keyed by english) and one audio path
//! (keyed by translation). A [`MediaFileMap`] holds the full set of
//! destinations that rows will reference plus the narrower subset that still
//! has to be fetched or copied.

use crate::error::{PipelineError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Word -> destination path.
pub type TargetMap = BTreeMap<String, PathBuf>;

const WORD_PLACEHOLDER: &str = "{word}";

fn has_separator(text: &str) -> bool {
    text.contains(['/', '\\', '\0'])
}

/// Check that a word can stand inside a single media file name.
///
/// Rows reference media by base name, so a word that would add a directory
/// level or climb out of the output directory cannot be planned.
pub fn check_file_name_word(word: &str) -> Result<()> {
    if has_separator(word) || word == "." || word.contains("..") {
        return Err(PipelineError::UnsafeFileName(word.to_string()));
    }
    Ok(())
}

/// A file name pattern with a single `{word}` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
    prefix: String,
    suffix: String,
}

impl FilenameTemplate {
    pub fn new(pattern: &str) -> Result<Self> {
        match pattern.split_once(WORD_PLACEHOLDER) {
            Some((prefix, suffix))
                if !suffix.contains(WORD_PLACEHOLDER) && !has_separator(prefix) && !has_separator(suffix) =>
            {
                Ok(Self {
                    prefix: prefix.to_string(),
                    suffix: suffix.to_string(),
                })
            }
            _ => Err(PipelineError::InvalidTemplate(pattern.to_string())),
        }
    }

    pub fn render(&self, word: &str) -> String {
        format!("{}{}{}", self.prefix, word, self.suffix)
    }
}

impl std::fmt::Display for FilenameTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.prefix, WORD_PLACEHOLDER, self.suffix)
    }
}

/// Destination path for every word. Pure: touches no files.
///
/// Words must already pass [`check_file_name_word`];
/// [`crate::WordTranslationSet`] enforces that for its keys.
pub fn compute_targets<'a, I>(words: I, output_dir: &Path, template: &FilenameTemplate) -> TargetMap
where
    I: IntoIterator<Item = &'a str>,
{
    words
        .into_iter()
        .map(|word| (word.to_string(), output_dir.join(template.render(word))))
        .collect()
}

/// Drop every target whose base name already exists directly in `directory`.
///
/// Narrows `targets` in place and returns the removed keys, in key order.
pub fn filter_existing(targets: &mut TargetMap, directory: &Path) -> Vec<String> {
    let skipped: Vec<String> = targets
        .iter()
        .filter(|(_, path)| {
            path.file_name()
                .map(|name| directory.join(name).is_file())
                .unwrap_or(false)
        })
        .map(|(key, _)| key.clone())
        .collect();

    for key in &skipped {
        targets.remove(key);
    }
    skipped
}

/// Full destinations plus the subset still to fetch.
///
/// The to-fetch map is always a subset of the full map: it is only ever
/// narrowed, and [`MediaFileMap::remove`] deletes from both.
#[derive(Debug, Clone, Default)]
pub struct MediaFileMap {
    targets: TargetMap,
    to_fetch: TargetMap,
}

impl MediaFileMap {
    /// Every target starts out as needing a fetch.
    pub fn new(targets: TargetMap) -> Self {
        let to_fetch = targets.clone();
        Self { targets, to_fetch }
    }

    /// Targets that rows reference but nothing will fetch.
    pub fn without_fetching(targets: TargetMap) -> Self {
        Self {
            targets,
            to_fetch: TargetMap::new(),
        }
    }

    pub fn targets(&self) -> &TargetMap {
        &self.targets
    }

    pub fn to_fetch(&self) -> &TargetMap {
        &self.to_fetch
    }

    pub fn get(&self, key: &str) -> Option<&Path> {
        self.targets.get(key).map(PathBuf::as_path)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.targets.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Stop fetching targets already present in `directory`.
    pub fn skip_existing(&mut self, directory: &Path) -> Vec<String> {
        filter_existing(&mut self.to_fetch, directory)
    }

    /// Remove a key from both the full and the to-fetch map.
    pub fn remove(&mut self, key: &str) -> Option<PathBuf> {
        self.to_fetch.remove(key);
        self.targets.remove(key)
    }
}
