//! Image search through a Google Custom Search engine.
//!
//! Searches in the source language: english image results are better than
//! most languages, and some translations are ambiguous (in Hebrew `foreign`
//! and `flower` are the same word).

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use flashcard_core::TargetMap;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::download::download_to;
use super::MediaFetcher;
use crate::config::Credentials;
use crate::error::{ConfigError, ProviderError};

const SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

/// Link of the top image result, if the search found anything.
pub fn first_image_link(body: &str) -> Result<Option<String>, ProviderError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    Ok(response.items.into_iter().next().map(|item| item.link))
}

#[derive(Clone)]
pub struct GoogleImageSearch {
    client: Client,
    api_key: String,
    engine_id: String,
    base_url: String,
    max_concurrent: usize,
}

impl GoogleImageSearch {
    pub fn new(client: Client, credentials: &Credentials, max_concurrent: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            api_key: credentials.google_api_key()?.to_string(),
            engine_id: credentials.google_cse_id()?.to_string(),
            base_url: SEARCH_URL.to_string(),
            max_concurrent: max_concurrent.max(1),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn search(&self, word: &str) -> Result<Option<String>, ProviderError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", word),
                ("searchType", "image"),
                ("num", "1"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Backend { status, message });
        }

        first_image_link(&resp.text().await?)
    }

    async fn fetch_one(&self, word: &str, destination: &Path) -> Result<(), ProviderError> {
        let link = self
            .search(word)
            .await?
            .ok_or_else(|| ProviderError::NoResult(word.to_string()))?;
        tracing::debug!("Retrieving image for {} from {}", word, link);
        download_to(&self.client, &link, destination).await
    }
}

impl MediaFetcher for GoogleImageSearch {
    async fn fetch(&self, targets: &TargetMap) -> BTreeSet<String> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for (word, destination) in targets {
            let this = self.clone();
            let semaphore = semaphore.clone();
            let word = word.clone();
            let destination = destination.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let result = this.fetch_one(&word, &destination).await;
                (word, result)
            });
        }

        // Anything not confirmed below counts as failed, including panicked tasks.
        let mut failed: BTreeSet<String> = targets.keys().cloned().collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((word, Ok(()))) => {
                    failed.remove(&word);
                }
                Ok((word, Err(e))) => {
                    tracing::error!("Failed on word {}: {}", word, e);
                }
                Err(e) => {
                    tracing::error!("Image fetch task failed: {}", e);
                }
            }
        }
        failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_image_link() {
        let body = r#"{
            "kind": "customsearch#search",
            "items": [
                {"title": "Water", "link": "https://example.com/water.jpg", "mime": "image/jpeg"},
                {"title": "More water", "link": "https://example.com/water2.jpg"}
            ]
        }"#;
        assert_eq!(
            first_image_link(body).unwrap(),
            Some("https://example.com/water.jpg".to_string())
        );
    }

    #[test]
    fn test_no_items_means_no_result() {
        let body = r#"{"kind": "customsearch#search", "searchInformation": {"totalResults": "0"}}"#;
        assert_eq!(first_image_link(body).unwrap(), None);
    }

    #[test]
    fn test_requires_engine_id() {
        let credentials = Credentials {
            google_api_key: Some("key".to_string()),
            ..Default::default()
        };
        let result = GoogleImageSearch::new(Client::new(), &credentials, 4);
        assert!(matches!(result, Err(ConfigError::MissingCredential("GOOGLE_CSE_ID"))));
    }
}
