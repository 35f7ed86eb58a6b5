//! Run orchestration.
//!
//! read table -> build word set (translating bare words first) -> plan media
//! -> copy or fetch -> reconcile misses -> check files -> format -> write.
//!
//! All word-set and media-map mutation happens here, on one task, after the
//! providers have reported back.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use flashcard_core::{
    compute_targets, detect_layout, make_rows, read_table, reconcile, single_words,
    strip_diacritics, verify_media_present, Entry, FetchFailures, ImportDialect, InputLayout,
    LatinScriptClassifier, MediaFileMap, RowSchema, WordClassifier, WordTranslationSet,
};

use crate::config::{MediaSource, RunConfig};
use crate::error::{AppError, ConfigError, ProviderError, Result};
use crate::providers::{copy_from_disk, MediaFetcher, Translator};
use crate::report::RunSummary;

/// The providers a run may call.
///
/// Each slot holds the provider or the reason it could not be built; the
/// error only surfaces if the run actually needs that provider.
pub struct Collaborators<T, I, A> {
    pub translator: std::result::Result<T, ConfigError>,
    pub images: std::result::Result<I, ConfigError>,
    pub audio: std::result::Result<A, ConfigError>,
    pub classifier: Box<dyn WordClassifier>,
}

impl<T, I, A> Collaborators<T, I, A> {
    pub fn new(
        translator: std::result::Result<T, ConfigError>,
        images: std::result::Result<I, ConfigError>,
        audio: std::result::Result<A, ConfigError>,
    ) -> Self {
        Self {
            translator,
            images,
            audio,
            classifier: Box::new(LatinScriptClassifier),
        }
    }

    pub fn with_classifier(mut self, classifier: impl WordClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }
}

fn require<P>(slot: &std::result::Result<P, ConfigError>) -> Result<&P> {
    slot.as_ref().map_err(|e| AppError::Config(e.clone()))
}

/// Run the whole pipeline. Nothing is written to the output file unless
/// every step before it succeeded.
pub async fn run<T, I, A>(config: &RunConfig, collaborators: &Collaborators<T, I, A>) -> Result<RunSummary>
where
    T: Translator,
    I: MediaFetcher,
    A: MediaFetcher,
{
    let mut summary = RunSummary::new(&config.input_file, &config.output_csv_file);

    let content = tokio::fs::read_to_string(&config.input_file)
        .await
        .map_err(|source| AppError::ReadInput {
            path: config.input_file.clone(),
            source,
        })?;
    let mut words = load_words(&content, config, collaborators).await?;
    tracing::info!("Loaded {} words from {}", words.len(), config.input_file.display());

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|source| AppError::WriteOutput {
            path: config.output_dir.clone(),
            source,
        })?;

    // Rows reference every planned file; only the to-fetch subset is acquired.
    let image_targets = compute_targets(words.english_words(), &config.output_dir, &config.image_template);
    let mut images = if config.fetch_images {
        MediaFileMap::new(image_targets)
    } else {
        MediaFileMap::without_fetching(image_targets)
    };
    let mut audio = MediaFileMap::new(compute_targets(
        words.translations(),
        &config.output_dir,
        &config.audio_template,
    ));

    if !config.override_images {
        summary.images_already_present = images.skip_existing(&config.output_dir);
    }
    summary.audio_already_present = audio.skip_existing(&config.output_dir);
    for word in summary
        .images_already_present
        .iter()
        .chain(&summary.audio_already_present)
    {
        tracing::info!("Media for {} already exists, so removing it from the current search", word);
    }

    match &config.media_source {
        MediaSource::LocalCopy {
            dir,
            image_template,
            audio_template,
        } => {
            copy_from_disk(images.to_fetch(), dir, image_template, "image").await?;
            copy_from_disk(audio.to_fetch(), dir, audio_template, "audio").await?;
        }
        MediaSource::Fetch => {
            let failures = fetch_media(&words, &images, &audio, collaborators).await?;
            summary.dropped = reconcile(&mut words, &mut images, &mut audio, &failures)?;
        }
    }

    verify_media_present(&words, config.fetch_images.then_some(&images), &audio)?;
    tracing::info!("Wrote media files to: {}", config.output_dir.display());

    let extra_info = words.extra_info();
    let rows = make_rows(&words, &images, &audio, Some(&extra_info))?;
    let encoded = ImportDialect::default().encode_rows(&rows)?;
    write_output(&config.output_csv_file, &encoded).await?;
    summary.rows_written = rows.len();
    tracing::warn!("Wrote Anki import csv to: {}", config.output_csv_file.display());

    Ok(summary)
}

async fn load_words<T, I, A>(
    content: &str,
    config: &RunConfig,
    collaborators: &Collaborators<T, I, A>,
) -> Result<WordTranslationSet>
where
    T: Translator,
{
    let rows = read_table(content)?;
    match detect_layout(&rows) {
        InputLayout::Pairs => Ok(WordTranslationSet::build(rows, RowSchema::default())?),
        InputLayout::SingleWord => {
            let words = single_words(rows)?;
            let translator = require(&collaborators.translator)?;
            let entries = translate_words(
                words,
                translator,
                collaborators.classifier.as_ref(),
                &config.source_language,
                &config.target_language,
            )
            .await?;
            Ok(WordTranslationSet::from_entries(entries)?)
        }
    }
}

/// Turn bare words into entries of (english, translation, pointed translation).
///
/// Source-language words are translated forward; target-language words are
/// translated back to get their english key and keep themselves as the
/// translation. Input order is preserved.
pub async fn translate_words<T: Translator>(
    words: Vec<String>,
    translator: &T,
    classifier: &dyn WordClassifier,
    source_language: &str,
    target_language: &str,
) -> Result<Vec<Entry>> {
    let (source_words, target_words): (Vec<_>, Vec<_>) = words
        .into_iter()
        .enumerate()
        .partition(|(_, word)| classifier.is_source_language(word));

    let forward = translate_batch(translator, &source_words, source_language, target_language).await?;
    let backward = translate_batch(translator, &target_words, target_language, source_language).await?;

    let mut pairs: Vec<(usize, String, String)> = source_words
        .into_iter()
        .zip(forward)
        .map(|((idx, english), translated)| (idx, english, translated))
        .chain(
            target_words
                .into_iter()
                .zip(backward)
                .map(|((idx, foreign), english)| (idx, english, foreign)),
        )
        .collect();
    pairs.sort_by_key(|(idx, _, _)| *idx);

    Ok(pairs
        .into_iter()
        .map(|(_, english, translated)| {
            Entry::new(english, strip_diacritics(&translated)).with_extra_info(vec![translated])
        })
        .collect())
}

async fn translate_batch<T: Translator>(
    translator: &T,
    words: &[(usize, String)],
    from: &str,
    to: &str,
) -> Result<Vec<String>> {
    if words.is_empty() {
        return Ok(Vec::new());
    }
    let texts: Vec<String> = words.iter().map(|(_, word)| word.clone()).collect();
    let translated = translator.translate(&texts, from, to).await?;
    if translated.len() != texts.len() {
        return Err(ProviderError::TranslationCount {
            expected: texts.len(),
            actual: translated.len(),
        }
        .into());
    }
    Ok(translated)
}

async fn fetch_media<T, I, A>(
    words: &WordTranslationSet,
    images: &MediaFileMap,
    audio: &MediaFileMap,
    collaborators: &Collaborators<T, I, A>,
) -> Result<FetchFailures>
where
    I: MediaFetcher,
    A: MediaFetcher,
{
    let image_failures = if images.to_fetch().is_empty() {
        BTreeSet::new()
    } else {
        require(&collaborators.images)?.fetch(images.to_fetch()).await
    };
    let audio_failures = if audio.to_fetch().is_empty() {
        BTreeSet::new()
    } else {
        require(&collaborators.audio)?.fetch(audio.to_fetch()).await
    };

    for english in &image_failures {
        tracing::warn!("Couldn't find image for: {} / {}", english, words.get_translation(english)?);
    }
    for translation in &audio_failures {
        tracing::warn!("Couldn't find audio for: {} / {}", words.get_english(translation)?, translation);
    }

    Ok(FetchFailures::new(image_failures, audio_failures))
}

/// Write through a sibling temp file so a failed write never leaves a
/// partial import file behind.
async fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let write_err = |source| AppError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };
    tokio::fs::write(&tmp, content).await.map_err(write_err)?;
    if let Err(source) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(write_err(source));
    }
    Ok(())
}
