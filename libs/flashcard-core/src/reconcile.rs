//! Partial-failure reconciliation.
//!
//! After a best-effort fetch, words whose image or audio could not be
//! obtained are removed from the word set and from both media maps so no row
//! ever references a missing file.

use crate::error::{PipelineError, Result};
use crate::media::MediaFileMap;
use crate::types::{DropReason, DroppedWord};
use crate::word_set::WordTranslationSet;
use std::collections::{BTreeMap, BTreeSet};

/// Keys whose media acquisition failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchFailures {
    /// English words without an image.
    pub images: BTreeSet<String>,
    /// Translations without audio.
    pub audio: BTreeSet<String>,
}

impl FetchFailures {
    pub fn new(images: BTreeSet<String>, audio: BTreeSet<String>) -> Self {
        Self { images, audio }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.audio.is_empty()
    }
}

/// Drop every word named in `failures` from the set and both maps.
///
/// All failure keys are resolved to english words before anything is
/// removed, so an unknown key aborts with no mutation. Each word is then
/// removed from the audio map, the image map and the set as one unit.
pub fn reconcile(
    words: &mut WordTranslationSet,
    images: &mut MediaFileMap,
    audio: &mut MediaFileMap,
    failures: &FetchFailures,
) -> Result<Vec<DroppedWord>> {
    let mut to_drop: BTreeMap<String, DropReason> = BTreeMap::new();

    for english in &failures.images {
        words.get_translation(english)?;
        to_drop.insert(english.clone(), DropReason::NoImage);
    }
    for translation in &failures.audio {
        let english = words.get_english(translation)?.to_string();
        to_drop
            .entry(english)
            .and_modify(|reason| *reason = DropReason::NoImageOrAudio)
            .or_insert(DropReason::NoAudio);
    }

    let mut dropped = Vec::with_capacity(to_drop.len());
    for (english, reason) in to_drop {
        let translation = words.get_translation(&english)?.to_string();
        audio.remove(&translation);
        images.remove(&english);
        words.remove_by_translation(&translation)?;
        dropped.push(DroppedWord {
            english,
            translation,
            reason,
        });
    }
    Ok(dropped)
}

/// Confirm every surviving word has its media on disk.
///
/// A failure here means a word was kept whose file never materialized,
/// which is a bookkeeping bug rather than a fetch miss.
pub fn verify_media_present(
    words: &WordTranslationSet,
    images: Option<&MediaFileMap>,
    audio: &MediaFileMap,
) -> Result<()> {
    for entry in words {
        if let Some(images) = images {
            ensure_file(images, &entry.english)?;
        }
        ensure_file(audio, &entry.translation)?;
    }
    Ok(())
}

fn ensure_file(map: &MediaFileMap, key: &str) -> Result<()> {
    match map.get(key) {
        Some(path) if path.is_file() => Ok(()),
        Some(path) => Err(PipelineError::MissingMedia {
            key: key.to_string(),
            path: path.to_path_buf(),
        }),
        None => Err(PipelineError::MissingMedia {
            key: key.to_string(),
            path: Default::default(),
        }),
    }
}
