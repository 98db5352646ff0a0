use crate::utils::{HeaderTranslatorError, Result, TranslationConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// An opaque text-to-text translation service.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}

/// Client for the public Google Translate `translate_a/single` endpoint.
pub struct GoogleTranslateClient {
    client: Client,
    endpoint: String,
    max_chars: usize,
}

impl GoogleTranslateClient {
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            max_chars: config.max_chars,
        })
    }

    fn validate(&self, text: &str) -> Result<()> {
        let chars = text.chars().count();
        if chars > self.max_chars {
            return Err(HeaderTranslatorError::UnsupportedInput(format!(
                "text is {chars} characters, limit is {}",
                self.max_chars
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslateClient {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        self.validate(text)?;

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HeaderTranslatorError::ApiError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let body: Value = response.json().await?;
        parse_translation_response(&body)
    }
}

/// The response is `[[["translated", "original", ...], ...], null, "detected-lang", ...]`.
fn parse_translation_response(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| HeaderTranslatorError::ApiError("No translation segments in response".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(HeaderTranslatorError::ApiError(
            "Empty translation in response".to_string(),
        ));
    }

    Ok(translated)
}
