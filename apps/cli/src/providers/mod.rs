//! External collaborators: translation, image search, pronunciations and
//! local media copies.
//!
//! Providers resolve each network call themselves. The pipeline only ever
//! sees a translated list or a set of keys that failed.

pub mod download;
pub mod forvo;
pub mod google_images;
pub mod google_translate;
pub mod local;

use std::collections::BTreeSet;

use flashcard_core::TargetMap;

use crate::error::ProviderError;

pub use forvo::ForvoPronunciations;
pub use google_images::GoogleImageSearch;
pub use google_translate::GoogleTranslate;
pub use local::copy_from_disk;

/// Translates an ordered batch of words.
#[allow(async_fn_in_trait)]
pub trait Translator {
    /// Output has the same length and order as `words`. Any failure fails
    /// the whole batch.
    async fn translate(
        &self,
        words: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError>;
}

/// Fetches one media file per key into its destination path.
#[allow(async_fn_in_trait)]
pub trait MediaFetcher {
    /// Best effort: returns the keys that could not be fetched.
    async fn fetch(&self, targets: &TargetMap) -> BTreeSet<String>;
}
