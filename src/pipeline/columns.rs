use crate::pipeline::dedup::dedup_names;
use crate::pipeline::progress::{NoProgress, ProgressCounter, ProgressScope, ProgressSink};
use crate::tabular::{Sheet, UNNAMED_PREFIX};
use crate::translation::{HeaderTranslator, TranslationOutcome, TranslationWarning};
use crate::utils::is_blank;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Everything one translation run needs, passed explicitly to each entry point.
#[derive(Clone)]
pub struct PipelineContext {
    pub translator: HeaderTranslator,
    /// Original header → replacement. Consulted for column headers only.
    pub overrides: HashMap<String, String>,
    pub progress: Arc<dyn ProgressSink>,
}

impl PipelineContext {
    pub fn new(translator: HeaderTranslator) -> Self {
        Self {
            translator,
            overrides: HashMap::new(),
            progress: Arc::new(NoProgress),
        }
    }

    pub fn with_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetPosition {
    pub index: usize,
    pub count: usize,
}

impl SheetPosition {
    pub fn single() -> Self {
        Self { index: 0, count: 1 }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessedSheet {
    pub sheet: Sheet,
    /// Headers dropped before translation.
    pub removed_columns: Vec<String>,
    pub warnings: Vec<TranslationWarning>,
}

/// True for blank headers and the `Unnamed: N` names generated for them on load.
pub fn is_placeholder_header(header: &str) -> bool {
    if is_blank(header) {
        return true;
    }
    let Some(rest) = header.strip_prefix(UNNAMED_PREFIX) else {
        return false;
    };
    let (index, level) = match rest.split_once("_level_") {
        Some((index, level)) => (index, Some(level)),
        None => (rest, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(index) && level.map_or(true, digits)
}

/// Drop placeholder columns in place, returning their headers.
pub fn remove_placeholder_columns(sheet: &mut Sheet) -> Vec<String> {
    let mut removed = Vec::new();
    sheet.columns.retain(|column| {
        if is_placeholder_header(&column.header) {
            removed.push(column.header.clone());
            false
        } else {
            true
        }
    });
    removed
}

/// Translate one sheet's headers.
///
/// Placeholder columns are removed first. Each remaining header takes its
/// override if one exists, otherwise goes through the translator. The result
/// is deduplicated and written back positionally.
pub async fn translate_sheet(
    ctx: &PipelineContext,
    mut sheet: Sheet,
    position: SheetPosition,
) -> ProcessedSheet {
    let removed_columns = remove_placeholder_columns(&mut sheet);
    if !removed_columns.is_empty() {
        debug!(sheet = %sheet.name, removed = ?removed_columns, "Dropped placeholder columns");
    }

    let mut progress = ProgressCounter::new(
        ProgressScope::Sheet,
        sheet.name.clone(),
        sheet.column_count(),
        ctx.progress.clone(),
    )
    .with_sheets(position.index + 1, position.count);
    progress.report();

    let mut translated = Vec::with_capacity(sheet.column_count());
    let mut warnings = Vec::new();

    for column in &sheet.columns {
        let outcome = match ctx.overrides.get(&column.header) {
            Some(replacement) => TranslationOutcome::Overridden(replacement.clone()),
            None => ctx.translator.translate(&column.header).await,
        };
        if let Some(warning) = outcome.warning() {
            warnings.push(warning);
        }
        translated.push(outcome.into_text());
        progress.advance(1);
    }

    sheet.rename_columns(dedup_names(&translated));

    ProcessedSheet {
        sheet,
        removed_columns,
        warnings,
    }
}
