use crate::pipeline::columns::{translate_sheet, PipelineContext, ProcessedSheet, SheetPosition};
use crate::pipeline::dedup::dedup_names;
use crate::pipeline::progress::{ProgressCounter, ProgressScope};
use crate::tabular::{Sheet, Workbook};
use crate::translation::TranslationWarning;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRename {
    pub original: String,
    pub translated: String,
}

/// Translated sheets in original order, keyed by their new (unique) names.
#[derive(Debug, Clone)]
pub struct TranslatedWorkbook {
    pub sheets: Vec<ProcessedSheet>,
    pub renames: Vec<SheetRename>,
    /// Failures while translating sheet names.
    pub name_warnings: Vec<TranslationWarning>,
}

impl TranslatedWorkbook {
    pub fn get(&self, name: &str) -> Option<&Sheet> {
        self.sheets
            .iter()
            .map(|p| &p.sheet)
            .find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|p| p.sheet.name.clone()).collect()
    }

    pub fn warnings(&self) -> Vec<TranslationWarning> {
        self.name_warnings
            .iter()
            .cloned()
            .chain(self.sheets.iter().flat_map(|p| p.warnings.iter().cloned()))
            .collect()
    }

    pub fn into_workbook(self) -> Workbook {
        Workbook::new(self.sheets.into_iter().map(|p| p.sheet).collect())
    }
}

/// Translate sheet names, then every sheet's headers.
///
/// Sheet names go through the translator only (overrides apply to column
/// headers) and are deduplicated across the whole workbook before any sheet
/// is processed.
pub async fn translate_workbook(ctx: &PipelineContext, workbook: Workbook) -> TranslatedWorkbook {
    let sheet_count = workbook.sheets.len();
    let total_columns = workbook.total_columns();

    let mut overall = ProgressCounter::new(
        ProgressScope::Workbook,
        "workbook",
        total_columns,
        ctx.progress.clone(),
    )
    .with_sheets(0, sheet_count);
    overall.report();

    let mut name_warnings = Vec::new();
    let mut translated_names = Vec::with_capacity(sheet_count);
    for sheet in &workbook.sheets {
        let outcome = ctx.translator.translate(&sheet.name).await;
        if let Some(warning) = outcome.warning() {
            name_warnings.push(warning);
        }
        translated_names.push(outcome.into_text());
    }
    let new_names = dedup_names(&translated_names);

    let mut sheets = Vec::with_capacity(sheet_count);
    let mut renames = Vec::with_capacity(sheet_count);

    for (index, (mut sheet, new_name)) in workbook.sheets.into_iter().zip(new_names).enumerate() {
        let columns = sheet.column_count();
        renames.push(SheetRename {
            original: std::mem::replace(&mut sheet.name, new_name.clone()),
            translated: new_name,
        });

        let processed = translate_sheet(ctx, sheet, SheetPosition { index, count: sheet_count }).await;
        sheets.push(processed);
        overall.finish_sheet(columns);
    }

    info!(
        sheets = sheet_count,
        columns = total_columns,
        warnings = name_warnings.len() + sheets.iter().map(|p| p.warnings.len()).sum::<usize>(),
        "Workbook translated"
    );

    TranslatedWorkbook {
        sheets,
        renames,
        name_warnings,
    }
}

/// Translate a single CSV grid. Its name is kept as-is.
pub async fn translate_csv(ctx: &PipelineContext, sheet: Sheet) -> ProcessedSheet {
    let columns = sheet.column_count();
    let mut overall = ProgressCounter::new(
        ProgressScope::Workbook,
        sheet.name.clone(),
        columns,
        ctx.progress.clone(),
    )
    .with_sheets(0, 1);
    overall.report();

    let processed = translate_sheet(ctx, sheet, SheetPosition::single()).await;
    overall.finish_sheet(columns);

    info!(columns, warnings = processed.warnings.len(), "CSV translated");
    processed
}
