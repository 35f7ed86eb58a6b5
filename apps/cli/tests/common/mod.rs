//! Common test utilities for pipeline integration tests.
//!
//! Provides:
//! - TestContext, a temp directory holding the input table, media folder and
//!   import file for one run
//! - In-memory fake providers (no network)

#![allow(dead_code)]

pub mod fixtures;

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;

use tempfile::TempDir;

use easy_anki::error::ProviderError;
use easy_anki::pipeline::Collaborators;
use easy_anki::providers::{MediaFetcher, Translator};
use easy_anki::{ConfigError, RunConfig};
use flashcard_core::TargetMap;

/// One run's working directory and config.
pub struct TestContext {
    pub dir: TempDir,
    pub config: RunConfig,
}

impl TestContext {
    /// Write `input` as the input table and point every output into the temp dir.
    pub fn new(input: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let input_file = dir.path().join("words.csv");
        std::fs::write(&input_file, input).expect("Failed to write input table");

        let config = RunConfig::new(
            input_file,
            dir.path().join("collection.media"),
            dir.path().join("cards.csv"),
        )
        .expect("Failed to build config");

        Self { dir, config }
    }

    pub fn media_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Create a file in the media folder as if a previous run had written it.
    pub fn put_media(&self, name: &str) {
        std::fs::create_dir_all(self.media_dir()).expect("Failed to create media dir");
        std::fs::write(self.media_dir().join(name), b"existing").expect("Failed to write media");
    }

    /// Contents of the import file, if one was written.
    pub fn output(&self) -> Option<String> {
        std::fs::read_to_string(&self.config.output_csv_file).ok()
    }
}

/// Translator backed by a fixed english/foreign word list.
pub struct FakeTranslator {
    pairs: Vec<(String, String)>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeTranslator {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            pairs: pairs
                .iter()
                .map(|(e, f)| (e.to_string(), f.to_string()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// (source, target) of each call, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Translator for FakeTranslator {
    async fn translate(
        &self,
        words: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((source_language.to_string(), target_language.to_string()));

        words
            .iter()
            .map(|word| {
                let found = if source_language == "en" {
                    self.pairs.iter().find(|(e, _)| e == word).map(|(_, f)| f.clone())
                } else {
                    self.pairs.iter().find(|(_, f)| f == word).map(|(e, _)| e.clone())
                };
                found.ok_or_else(|| ProviderError::NoResult(word.clone()))
            })
            .collect()
    }
}

/// Writes a small file for every key except the ones told to fail.
pub struct FakeFetcher {
    failing: BTreeSet<String>,
    requested: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new(failing: &[&str]) -> Self {
        Self {
            failing: failing.iter().map(|k| k.to_string()).collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Keys the pipeline asked for, in request order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl MediaFetcher for FakeFetcher {
    async fn fetch(&self, targets: &TargetMap) -> BTreeSet<String> {
        let mut failed = BTreeSet::new();
        for (key, path) in targets {
            self.requested.lock().unwrap().push(key.clone());
            if self.failing.contains(key) {
                failed.insert(key.clone());
            } else {
                std::fs::write(path, b"media").unwrap();
            }
        }
        failed
    }
}

pub type FakeCollaborators = Collaborators<FakeTranslator, FakeFetcher, FakeFetcher>;

/// Fakes for every provider; the translator knows `pairs`.
pub fn collaborators(
    pairs: &[(&str, &str)],
    image_failures: &[&str],
    audio_failures: &[&str],
) -> FakeCollaborators {
    Collaborators::new(
        Ok(FakeTranslator::new(pairs)),
        Ok(FakeFetcher::new(image_failures)),
        Ok(FakeFetcher::new(audio_failures)),
    )
}

/// Collaborators whose providers could not be configured.
pub fn unconfigured() -> FakeCollaborators {
    Collaborators::new(
        Err(ConfigError::MissingCredential("GOOGLE_API_KEY")),
        Err(ConfigError::MissingCredential("GOOGLE_CSE_ID")),
        Err(ConfigError::MissingCredential("FORVO_API_KEY")),
    )
}

pub fn images(collaborators: &FakeCollaborators) -> &FakeFetcher {
    collaborators.images.as_ref().unwrap()
}

pub fn audio(collaborators: &FakeCollaborators) -> &FakeFetcher {
    collaborators.audio.as_ref().unwrap()
}
