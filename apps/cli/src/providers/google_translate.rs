//! Google Cloud Translation (v2 REST) client.

use reqwest::Client;
use serde::Deserialize;

use super::Translator;
use crate::config::Credentials;
use crate::error::{ConfigError, ProviderError};

const TRANSLATE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// The API only translates a limited number of strings per request.
pub const MAX_WORDS_PER_REQUEST: usize = 100;

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

/// Extract translated strings from a response body, in request order.
pub fn parse_translations(body: &str) -> Result<Vec<String>, ProviderError> {
    let response: TranslateResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    Ok(response
        .data
        .translations
        .into_iter()
        .map(|t| t.translated_text)
        .collect())
}

pub struct GoogleTranslate {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleTranslate {
    pub fn new(client: Client, credentials: &Credentials) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            api_key: credentials.google_api_key()?.to_string(),
            base_url: TRANSLATE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn translate_batch(
        &self,
        batch: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        // format=text keeps apostrophes from coming back as HTML entities.
        let mut query: Vec<(&str, &str)> = vec![
            ("key", self.api_key.as_str()),
            ("source", source_language),
            ("target", target_language),
            ("format", "text"),
        ];
        query.extend(batch.iter().map(|word| ("q", word.as_str())));

        let resp = self.client.get(&self.base_url).query(&query).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Backend { status, message });
        }

        let translations = parse_translations(&resp.text().await?)?;
        if translations.len() != batch.len() {
            return Err(ProviderError::TranslationCount {
                expected: batch.len(),
                actual: translations.len(),
            });
        }
        Ok(translations)
    }
}

impl Translator for GoogleTranslate {
    async fn translate(
        &self,
        words: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let mut translated = Vec::with_capacity(words.len());
        for batch in words.chunks(MAX_WORDS_PER_REQUEST) {
            translated.extend(
                self.translate_batch(batch, source_language, target_language)
                    .await?,
            );
        }
        tracing::info!(
            "Translated {} words from {} to {}",
            translated.len(),
            source_language,
            target_language
        );
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_translations() {
        let body = r#"{
            "data": {
                "translations": [
                    {"translatedText": "מַיִם", "detectedSourceLanguage": "en"},
                    {"translatedText": "שֶׁמֶשׁ"}
                ]
            }
        }"#;
        assert_eq!(
            parse_translations(body).unwrap(),
            vec!["מַיִם".to_string(), "שֶׁמֶשׁ".to_string()]
        );
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid"}}"#;
        assert!(matches!(parse_translations(body), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn test_requires_api_key() {
        let result = GoogleTranslate::new(Client::new(), &Credentials::default());
        assert!(matches!(result, Err(ConfigError::MissingCredential("GOOGLE_API_KEY"))));
    }
}
