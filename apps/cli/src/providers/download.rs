//! Download a URL to a file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use reqwest::Client;

use crate::error::ProviderError;

/// Fetch `url` into `destination`.
///
/// The body is written to a `.part` sibling and renamed into place, so an
/// interrupted download never leaves a file that a later run would treat as
/// already present.
pub async fn download_to(client: &Client, url: &str, destination: &Path) -> Result<(), ProviderError> {
    let resp = client.get(url).send().await?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        return Err(ProviderError::Backend { status, message });
    }

    let bytes = resp.bytes().await?;
    if bytes.is_empty() {
        return Err(ProviderError::EmptyDownload(url.to_string()));
    }

    let partial = partial_path(destination);
    tokio::fs::write(&partial, &bytes).await?;
    if let Err(e) = tokio::fs::rename(&partial, destination).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e.into());
    }

    tracing::debug!("Downloaded {} to {}", url, destination.display());
    Ok(())
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}
