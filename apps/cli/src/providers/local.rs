//! Copy media from a directory of previously downloaded files.

use std::path::Path;

use flashcard_core::{FilenameTemplate, TargetMap};

use crate::error::ProviderError;

/// Copy `media_dir/<template(word)>` to each target.
///
/// Every source is checked before anything is copied. A missing source is a
/// configuration problem, so the whole copy fails rather than dropping the
/// word.
pub async fn copy_from_disk(
    targets: &TargetMap,
    media_dir: &Path,
    template: &FilenameTemplate,
    kind: &'static str,
) -> Result<usize, ProviderError> {
    let mut copies = Vec::with_capacity(targets.len());
    for (word, destination) in targets {
        let source = media_dir.join(template.render(word));
        if !tokio::fs::try_exists(&source).await? {
            return Err(ProviderError::MissingLocalMedia {
                word: word.clone(),
                kind,
                path: source,
            });
        }
        copies.push((source, destination));
    }

    for (source, destination) in &copies {
        tokio::fs::copy(source, destination).await?;
    }
    tracing::info!("Copied {} {} files from {}", copies.len(), kind, media_dir.display());
    Ok(copies.len())
}
