use crate::pipeline::{
    FanOut, PipelineContext, ProgressScope, ProgressSnapshot, RecordingProgress, TracingProgress,
};
use crate::tabular::{JsonOptions, JsonOrient};
use crate::translation::{
    GoogleTranslateClient, HeaderTranslator, TranslationBackend, TranslationCache, TranslationWarning,
};
use crate::utils::{AppConfig, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-wide state: one translator and cache shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub context: PipelineContext,
    pub progress: Arc<RecordingProgress>,
    /// Warnings from the most recent translation run.
    pub last_warnings: Arc<RwLock<Vec<TranslationWarning>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub sheet: Option<ProgressSnapshot>,
    pub overall: Option<ProgressSnapshot>,
    pub cached_translations: usize,
    pub warnings: Vec<TranslationWarning>,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let backend = GoogleTranslateClient::new(&config.translation)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    pub fn with_backend(config: AppConfig, backend: Arc<dyn TranslationBackend>) -> Self {
        let progress = Arc::new(RecordingProgress::new());
        let translator =
            HeaderTranslator::from_config(backend, TranslationCache::new(), &config.translation);
        let context = PipelineContext::new(translator)
            .with_overrides(config.overrides.clone())
            .with_progress(Arc::new(FanOut(vec![
                progress.clone(),
                Arc::new(TracingProgress),
            ])));

        Self {
            config,
            context,
            progress,
            last_warnings: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Configured JSON defaults with per-call overrides applied.
    pub fn json_options(
        &self,
        orient: Option<JsonOrient>,
        indent: Option<usize>,
        ascii_only: Option<bool>,
    ) -> JsonOptions {
        JsonOptions {
            orient: orient.unwrap_or_default(),
            indent: indent.or(self.config.output.json_indent),
            ascii_only: ascii_only.unwrap_or(self.config.output.ascii_only),
        }
    }

    pub async fn record_warnings(&self, warnings: &[TranslationWarning]) {
        *self.last_warnings.write().await = warnings.to_vec();
    }

    pub async fn progress_report(&self) -> ProgressReport {
        ProgressReport {
            sheet: self.progress.latest(ProgressScope::Sheet),
            overall: self.progress.latest(ProgressScope::Workbook),
            cached_translations: self.context.translator.cache().len().await,
            warnings: self.last_warnings.read().await.clone(),
        }
    }
}
