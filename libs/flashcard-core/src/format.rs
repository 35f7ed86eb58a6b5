//! Anki import rows.
//!
//! [`make_rows`] turns the reconciled word set and media maps into
//! [`OutputRow`]s; [`ImportDialect`] serializes them. The Anki importer takes
//! quote characters inside fields literally, so the dialect never doubles or
//! escapes them.

use crate::error::{PipelineError, Result};
use crate::media::MediaFileMap;
use crate::types::OutputRow;
use crate::word_set::WordTranslationSet;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

fn image_tag(path: &Path) -> String {
    format!("<img src=\"{}\">", base_name(path))
}

fn sound_tag(path: &Path) -> String {
    format!("[sound:{}]", base_name(path))
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn validate_inputs(
    words: &WordTranslationSet,
    images: &MediaFileMap,
    audio: &MediaFileMap,
    extra_info: Option<&BTreeMap<String, Vec<String>>>,
) -> Result<()> {
    let english: BTreeSet<&str> = words.english_words().into_iter().collect();
    let image_keys: BTreeSet<&str> = images.keys().collect();
    if english != image_keys {
        return Err(PipelineError::KeySetMismatch {
            left: "english words",
            right: "image filenames",
            left_len: english.len(),
            right_len: image_keys.len(),
        });
    }

    let translations: BTreeSet<&str> = words.translations().into_iter().collect();
    let audio_keys: BTreeSet<&str> = audio.keys().collect();
    if translations != audio_keys {
        return Err(PipelineError::KeySetMismatch {
            left: "translations",
            right: "audio filenames",
            left_len: translations.len(),
            right_len: audio_keys.len(),
        });
    }

    if let Some(extra_info) = extra_info {
        if !extra_info.keys().all(|k| english.contains(k.as_str())) {
            return Err(PipelineError::ExtraInfoNotSubset {
                extra_len: extra_info.len(),
                english_len: english.len(),
            });
        }
    }
    Ok(())
}

/// Format one row per entry, in set order.
///
/// Fails before producing anything if the set and the maps disagree on
/// their keys.
pub fn make_rows(
    words: &WordTranslationSet,
    images: &MediaFileMap,
    audio: &MediaFileMap,
    extra_info: Option<&BTreeMap<String, Vec<String>>>,
) -> Result<Vec<OutputRow>> {
    validate_inputs(words, images, audio, extra_info)?;

    words
        .iter()
        .map(|entry| {
            let image = images
                .get(&entry.english)
                .ok_or_else(|| PipelineError::UnknownEnglish(entry.english.clone()))?;
            let sound = audio
                .get(&entry.translation)
                .ok_or_else(|| PipelineError::UnknownTranslation(entry.translation.clone()))?;
            let extra = extra_info
                .and_then(|info| info.get(&entry.english))
                .cloned()
                .unwrap_or_default();

            Ok(OutputRow {
                image_ref: image_tag(image),
                translation: entry.translation.clone(),
                audio_ref: sound_tag(sound),
                english: entry.english.clone(),
                extra,
            })
        })
        .collect()
}

/// Separator and quoting rules for the import file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportDialect {
    pub delimiter: char,
    pub quote: char,
    pub line_terminator: &'static str,
}

impl Default for ImportDialect {
    fn default() -> Self {
        Self {
            delimiter: ';',
            quote: '\'',
            line_terminator: "\r\n",
        }
    }
}

impl ImportDialect {
    /// Quote a field only if it holds the delimiter or a line break.
    ///
    /// Quote characters are never escaped, so a field that starts with one,
    /// or that needs quoting and contains one, has no faithful encoding.
    pub fn encode_field(&self, field: &str) -> Result<String> {
        if field.starts_with(self.quote) {
            return Err(PipelineError::UnwritableField(field.to_string()));
        }
        let needs_quotes = field.contains(self.delimiter) || field.contains(['\n', '\r']);
        if !needs_quotes {
            return Ok(field.to_string());
        }
        if field.contains(self.quote) {
            return Err(PipelineError::UnwritableField(field.to_string()));
        }
        Ok(format!("{q}{field}{q}", q = self.quote))
    }

    pub fn encode_row(&self, row: &OutputRow) -> Result<String> {
        let fields = row
            .fields()
            .map(|f| self.encode_field(f))
            .collect::<Result<Vec<_>>>()?;
        Ok(fields.join(&self.delimiter.to_string()))
    }

    /// Encode every row up front so a bad field aborts before any write.
    pub fn encode_rows(&self, rows: &[OutputRow]) -> Result<String> {
        let mut out = String::new();
        for row in rows {
            out.push_str(&self.encode_row(row)?);
            out.push_str(self.line_terminator);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{compute_targets, FilenameTemplate};
    use crate::types::RowSchema;
    use pretty_assertions::assert_eq;

    fn setup(rows: Vec<Vec<&str>>) -> (WordTranslationSet, MediaFileMap, MediaFileMap) {
        let words = WordTranslationSet::build(rows, RowSchema::default()).unwrap();
        let dir = Path::new("/anki/collection.media");
        let images = MediaFileMap::new(compute_targets(
            words.english_words(),
            dir,
            &FilenameTemplate::new("{word}.jpg").unwrap(),
        ));
        let audio = MediaFileMap::new(compute_targets(
            words.translations(),
            dir,
            &FilenameTemplate::new("{word}.mp3").unwrap(),
        ));
        (words, images, audio)
    }

    #[test]
    fn test_rows_follow_set_order_and_shape() {
        let (words, images, audio) = setup(vec![vec!["water", "מים"], vec!["sun", "שמש"]]);
        let rows = make_rows(&words, &images, &audio, None).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].image_ref, "<img src=\"water.jpg\">");
        assert_eq!(rows[0].translation, "מים");
        assert_eq!(rows[0].audio_ref, "[sound:מים.mp3]");
        assert_eq!(rows[0].english, "water");
        assert_eq!(rows[1].english, "sun");
        assert!(rows.iter().all(|r| r.extra.is_empty()));
    }

    #[test]
    fn test_extra_info_appended_only_where_present() {
        let (words, images, audio) = setup(vec![vec!["water", "מים", "מַיִם"], vec!["sun", "שמש"]]);
        let extra = words.extra_info();
        let rows = make_rows(&words, &images, &audio, Some(&extra)).unwrap();

        assert_eq!(rows[0].extra, vec!["מַיִם".to_string()]);
        assert_eq!(rows[0].field_count(), 5);
        assert_eq!(rows[1].field_count(), 4);
    }

    #[test]
    fn test_image_key_mismatch_is_rejected() {
        let (words, mut images, audio) = setup(vec![vec!["water", "מים"], vec!["sun", "שמש"]]);
        images.remove("sun");
        let result = make_rows(&words, &images, &audio, None);
        assert!(matches!(
            result,
            Err(PipelineError::KeySetMismatch { right: "image filenames", left_len: 2, right_len: 1, .. })
        ));
    }

    #[test]
    fn test_audio_key_mismatch_is_rejected() {
        let (words, images, mut audio) = setup(vec![vec!["water", "מים"]]);
        audio.remove("מים");
        let result = make_rows(&words, &images, &audio, None);
        assert!(matches!(
            result,
            Err(PipelineError::KeySetMismatch { right: "audio filenames", .. })
        ));
    }

    #[test]
    fn test_extra_info_must_be_subset() {
        let (words, images, audio) = setup(vec![vec!["water", "מים"]]);
        let extra: BTreeMap<String, Vec<String>> =
            [("moon".to_string(), vec!["ירח".to_string()])].into_iter().collect();
        let result = make_rows(&words, &images, &audio, Some(&extra));
        assert!(matches!(result, Err(PipelineError::ExtraInfoNotSubset { .. })));
    }

    #[test]
    fn test_dialect_leaves_quotes_alone() {
        let dialect = ImportDialect::default();
        assert_eq!(dialect.encode_field("<img src=\"a.png\">").unwrap(), "<img src=\"a.png\">");
        assert_eq!(dialect.encode_field("it's").unwrap(), "it's");
    }

    #[test]
    fn test_dialect_quotes_delimiter_and_newlines() {
        let dialect = ImportDialect::default();
        assert_eq!(dialect.encode_field("a;b").unwrap(), "'a;b'");
        assert_eq!(dialect.encode_field("a\nb").unwrap(), "'a\nb'");
    }

    #[test]
    fn test_dialect_rejects_unrepresentable_field() {
        let dialect = ImportDialect::default();
        assert!(matches!(
            dialect.encode_field("it's; fine"),
            Err(PipelineError::UnwritableField(_))
        ));
    }

    #[test]
    fn test_dialect_rejects_leading_quote() {
        let dialect = ImportDialect::default();
        for field in ["'til", "'cause", "'"] {
            assert!(matches!(
                dialect.encode_field(field),
                Err(PipelineError::UnwritableField(f)) if f == field
            ));
        }
        assert_eq!(dialect.encode_field("rock 'n' roll").unwrap(), "rock 'n' roll");
    }

    #[test]
    fn test_encode_rows_writes_ragged_lines() {
        let (words, images, audio) = setup(vec![vec!["water", "מים", "מַיִם"], vec!["sun", "שמש"]]);
        let extra = words.extra_info();
        let rows = make_rows(&words, &images, &audio, Some(&extra)).unwrap();
        let encoded = ImportDialect::default().encode_rows(&rows).unwrap();

        assert_eq!(
            encoded,
            "<img src=\"water.jpg\">;מים;[sound:מים.mp3];water;מַיִם\r\n\
             <img src=\"sun.jpg\">;שמש;[sound:שמש.mp3];sun\r\n"
        );
    }
}
