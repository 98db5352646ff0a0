use crate::translation::cache::TranslationCache;
use crate::translation::client::TranslationBackend;
use crate::utils::{is_blank, TranslationConfig};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of translating one piece of text. Every variant carries a usable string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated(String),
    Cached(String),
    /// Blank text, returned as-is without touching the backend or the cache.
    Skipped(String),
    /// Caller-supplied replacement.
    Overridden(String),
    Failed { original: String, error: String },
}

impl TranslationOutcome {
    pub fn text(&self) -> &str {
        match self {
            TranslationOutcome::Translated(t)
            | TranslationOutcome::Cached(t)
            | TranslationOutcome::Skipped(t)
            | TranslationOutcome::Overridden(t) => t,
            TranslationOutcome::Failed { original, .. } => original,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            TranslationOutcome::Translated(t)
            | TranslationOutcome::Cached(t)
            | TranslationOutcome::Skipped(t)
            | TranslationOutcome::Overridden(t) => t,
            TranslationOutcome::Failed { original, .. } => original,
        }
    }

    pub fn warning(&self) -> Option<TranslationWarning> {
        match self {
            TranslationOutcome::Failed { original, error } => Some(TranslationWarning {
                text: original.clone(),
                message: format!("Could not translate '{}': {}", original, error),
            }),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TranslationOutcome::Failed { .. })
    }
}

/// Non-fatal failure surfaced to the user after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationWarning {
    pub text: String,
    pub message: String,
}

/// Backend plus cache, with a fixed source/target language pair.
#[derive(Clone)]
pub struct HeaderTranslator {
    backend: Arc<dyn TranslationBackend>,
    cache: TranslationCache,
    source_lang: String,
    target_lang: String,
}

impl HeaderTranslator {
    /// Auto-detect source, English target.
    pub fn new(backend: Arc<dyn TranslationBackend>, cache: TranslationCache) -> Self {
        Self {
            backend,
            cache,
            source_lang: "auto".to_string(),
            target_lang: "en".to_string(),
        }
    }

    pub fn from_config(
        backend: Arc<dyn TranslationBackend>,
        cache: TranslationCache,
        config: &TranslationConfig,
    ) -> Self {
        Self {
            backend,
            cache,
            source_lang: config.source_lang.clone(),
            target_lang: config.target_lang.clone(),
        }
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub async fn translate(&self, text: &str) -> TranslationOutcome {
        if is_blank(text) {
            return TranslationOutcome::Skipped(text.to_string());
        }

        if let Some(hit) = self.cache.lookup(text).await {
            debug!(text = %text, translated = %hit, "Cache hit");
            return TranslationOutcome::Cached(hit);
        }

        match self
            .backend
            .translate(text, &self.source_lang, &self.target_lang)
            .await
        {
            Ok(translated) => {
                self.cache.store(text.to_string(), translated.clone()).await;
                TranslationOutcome::Translated(translated)
            }
            Err(e) => {
                warn!(text = %text, error = %e, "Translation failed, keeping original text");
                TranslationOutcome::Failed {
                    original: text.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }
}
