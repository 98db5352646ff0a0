use crate::translation::TranslationBackend;
use crate::utils::{HeaderTranslatorError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Backend double that counts calls and fails on chosen inputs.
#[derive(Clone, Default)]
pub(crate) struct StubBackend {
    mapping: HashMap<String, String>,
    fallback: Option<String>,
    failing: HashSet<String>,
    calls: Arc<AtomicUsize>,
    seen: Arc<std::sync::Mutex<Vec<String>>>,
}

impl StubBackend {
    /// Every input translates to `value`.
    pub(crate) fn constant(value: &str) -> Self {
        Self {
            fallback: Some(value.to_string()),
            ..Self::default()
        }
    }

    /// Listed inputs translate; anything else echoes back unchanged.
    pub(crate) fn mapping(pairs: &[(&str, &str)]) -> Self {
        Self {
            mapping: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TranslationBackend for StubBackend {
    async fn translate(&self, text: &str, _source_lang: &str, _target_lang: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(text.to_string());
        }

        if self.failing.contains(text) {
            return Err(HeaderTranslatorError::ApiError("backend unavailable".to_string()));
        }
        if let Some(mapped) = self.mapping.get(text) {
            return Ok(mapped.clone());
        }
        Ok(self.fallback.clone().unwrap_or_else(|| text.to_string()))
    }
}
