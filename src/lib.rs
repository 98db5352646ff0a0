pub mod pipeline;
pub mod server;
pub mod state;
pub mod tabular;
pub mod translation;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_util;

pub use pipeline::{
    dedup_names, translate_csv, translate_file_bytes, translate_sheet, translate_workbook,
    PipelineContext, ProgressSink, TranslatedWorkbook,
};
pub use state::AppState;
pub use tabular::{convert_csv_to_json, CsvSource, JsonOptions, JsonOrient, Sheet, Workbook};
pub use translation::{GoogleTranslateClient, HeaderTranslator, TranslationBackend, TranslationCache};
pub use utils::{AppConfig, HeaderTranslatorError, Result};
