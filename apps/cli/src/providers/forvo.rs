//! Native-speaker pronunciations from the Forvo word dictionary.

use std::collections::BTreeSet;
use std::path::Path;

use flashcard_core::TargetMap;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::download::download_to;
use super::MediaFetcher;
use crate::config::Credentials;
use crate::error::{ConfigError, ProviderError};

const FORVO_URL: &str = "https://apifree.forvo.com";

#[derive(Debug, Deserialize)]
struct PronunciationList {
    #[serde(default)]
    items: Vec<Pronunciation>,
}

#[derive(Debug, Deserialize)]
struct Pronunciation {
    pathmp3: String,
    #[serde(default)]
    rate: i64,
}

/// mp3 link of the highest rated pronunciation. Ties go to the first listed.
pub fn best_mp3_link(body: &str) -> Result<Option<String>, ProviderError> {
    let list: PronunciationList =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let best = list.items.into_iter().fold(None::<Pronunciation>, |best, item| match best {
        Some(current) if current.rate >= item.rate => Some(current),
        _ => Some(item),
    });
    Ok(best.map(|p| p.pathmp3))
}

pub struct ForvoPronunciations {
    client: Client,
    api_key: String,
    language: String,
    base_url: String,
}

impl ForvoPronunciations {
    pub fn new(client: Client, credentials: &Credentials, language: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            api_key: credentials.forvo_api_key()?.to_string(),
            language: language.into(),
            base_url: FORVO_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request URL for a word; the word is percent-encoded as a path segment.
    pub fn word_url(&self, word: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| ProviderError::Parse(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Parse(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend([
                "key",
                self.api_key.as_str(),
                "format",
                "json",
                "action",
                "word-pronunciations",
                "word",
                word,
                "language",
                self.language.as_str(),
            ]);
        Ok(url)
    }

    async fn fetch_one(&self, word: &str, destination: &Path) -> Result<(), ProviderError> {
        let resp = self.client.get(self.word_url(word)?).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Backend { status, message });
        }

        let link = best_mp3_link(&resp.text().await?)?
            .ok_or_else(|| ProviderError::NoResult(word.to_string()))?;
        download_to(&self.client, &link, destination).await
    }
}

impl MediaFetcher for ForvoPronunciations {
    async fn fetch(&self, targets: &TargetMap) -> BTreeSet<String> {
        let mut failed = BTreeSet::new();
        for (word, destination) in targets {
            if let Err(e) = self.fetch_one(word, destination).await {
                tracing::warn!("Couldn't find audio on Forvo for `{}`: {}", word, e);
                failed.insert(word.clone());
            }
        }
        failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "attributes": {"total": 3},
        "items": [
            {"id": 1, "word": "מים", "pathmp3": "https://apifree.forvo.com/audio/low", "rate": 0},
            {"id": 2, "word": "מים", "pathmp3": "https://apifree.forvo.com/audio/best", "rate": 4},
            {"id": 3, "word": "מים", "pathmp3": "https://apifree.forvo.com/audio/tied", "rate": 4}
        ]
    }"#;

    fn credentials() -> Credentials {
        Credentials {
            forvo_api_key: Some("abc".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_best_mp3_link_picks_highest_rate() {
        assert_eq!(
            best_mp3_link(SAMPLE).unwrap(),
            Some("https://apifree.forvo.com/audio/best".to_string())
        );
    }

    #[test]
    fn test_no_pronunciations() {
        let body = r#"{"attributes": {"total": 0}, "items": []}"#;
        assert_eq!(best_mp3_link(body).unwrap(), None);
    }

    #[test]
    fn test_word_url_encodes_word() {
        let forvo = ForvoPronunciations::new(Client::new(), &credentials(), "he").unwrap();
        let url = forvo.word_url("מים").unwrap();
        assert!(url.as_str().starts_with(
            "https://apifree.forvo.com/key/abc/format/json/action/word-pronunciations/word/%D7%9E"
        ));
        assert!(url.as_str().ends_with("/language/he"));
    }

    #[test]
    fn test_word_url_keeps_spaces_in_one_segment() {
        let forvo = ForvoPronunciations::new(Client::new(), &credentials(), "he")
            .unwrap()
            .with_base_url("http://localhost:9000/");
        let url = forvo.word_url("ice cream").unwrap();
        assert!(url.as_str().contains("/word/ice%20cream/language/he"));
    }
}
