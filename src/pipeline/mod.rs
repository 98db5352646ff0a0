pub mod columns;
pub mod dedup;
pub mod file;
pub mod progress;
pub mod workbook;

pub use columns::{
    is_placeholder_header, remove_placeholder_columns, translate_sheet, PipelineContext,
    ProcessedSheet, SheetPosition,
};
pub use dedup::dedup_names;
pub use file::{
    convert_file_to_json, output_file_name, translate_file_bytes, translate_path, JsonConversion,
    TranslatedFile,
};
pub use progress::{
    FanOut, NoProgress, ProgressCounter, ProgressScope, ProgressSink, ProgressSnapshot,
    RecordingProgress, TracingProgress,
};
pub use workbook::{translate_csv, translate_workbook, SheetRename, TranslatedWorkbook};
