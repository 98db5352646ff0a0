use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source text → translated text, keyed by exact string equality.
///
/// Clones share the same map, so one instance can back several pipelines.
/// Entries live as long as the last clone; nothing is evicted.
#[derive(Debug, Clone, Default)]
pub struct TranslationCache {
    terms: Arc<RwLock<HashMap<String, String>>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lookup(&self, source: &str) -> Option<String> {
        let terms = self.terms.read().await;
        terms.get(source).cloned()
    }

    pub async fn store(&self, source: String, target: String) {
        self.terms.write().await.insert(source, target);
    }

    pub async fn len(&self) -> usize {
        self.terms.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.terms.read().await.is_empty()
    }
}
