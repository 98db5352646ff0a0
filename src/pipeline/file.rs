use crate::pipeline::columns::PipelineContext;
use crate::pipeline::workbook::{translate_csv, translate_workbook, SheetRename};
use crate::tabular::{
    convert_csv_to_json, csv_bytes, read_csv_bytes, read_workbook_bytes, workbook_bytes,
    ConvertedJson, CsvSource, FileKind, JsonOptions, Sheet,
};
use crate::translation::TranslationWarning;
use crate::utils::Result;
use tracing::{info, warn};

/// A translated upload, ready to hand back as a download.
#[derive(Debug, Clone)]
pub struct TranslatedFile {
    pub kind: FileKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub sheets: Vec<Sheet>,
    pub renames: Vec<SheetRename>,
    pub warnings: Vec<TranslationWarning>,
}

impl TranslatedFile {
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}

pub fn output_file_name(kind: FileKind) -> String {
    format!("translated_headers.{}", kind.extension())
}

/// Parse an uploaded file, translate it, and serialize the result.
///
/// Parse failures abort the run; translation failures only add warnings.
pub async fn translate_file_bytes(
    ctx: &PipelineContext,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<TranslatedFile> {
    let kind = FileKind::from_path(file_name)?;

    let (bytes, sheets, renames, warnings) = match kind {
        FileKind::Csv => {
            let sheet = read_csv_bytes(&bytes, "CSV")?;
            let processed = translate_csv(ctx, sheet).await;
            let out = csv_bytes(&processed.sheet)?;
            (out, vec![processed.sheet], Vec::new(), processed.warnings)
        }
        FileKind::Spreadsheet => {
            let workbook = read_workbook_bytes(bytes)?;
            let translated = translate_workbook(ctx, workbook).await;
            let warnings = translated.warnings();
            let renames = translated.renames.clone();
            let workbook = translated.into_workbook();
            let out = workbook_bytes(&workbook)?;
            (out, workbook.sheets, renames, warnings)
        }
    };

    for warning in &warnings {
        warn!(text = %warning.text, "{}", warning.message);
    }
    info!(input = %file_name, bytes = bytes.len(), "Translated file ready");

    Ok(TranslatedFile {
        kind,
        file_name: output_file_name(kind),
        bytes,
        sheets,
        renames,
        warnings,
    })
}

/// Translate a file on disk and write the result next to the caller's choice of path.
pub async fn translate_path(
    ctx: &PipelineContext,
    input: &str,
    output: Option<&str>,
) -> Result<TranslatedFile> {
    if !crate::tabular::reader::file_exists(input) {
        return Err(crate::utils::HeaderTranslatorError::FileNotFound(input.to_string()));
    }
    let bytes = tokio::fs::read(input).await?;
    let translated = translate_file_bytes(ctx, input, bytes).await?;

    let target = output.map(str::to_string).unwrap_or_else(|| translated.file_name.clone());
    tokio::fs::write(&target, &translated.bytes).await?;
    info!(output = %target, "Wrote translated file");

    Ok(translated)
}

#[derive(Debug, Clone)]
pub enum JsonConversion {
    Converted(ConvertedJson),
    /// JSON was requested for a file that is not CSV. Nothing was done.
    Unsupported { warning: String },
}

/// Convert the original, untranslated CSV upload to JSON.
pub fn convert_file_to_json(
    file_name: &str,
    bytes: Vec<u8>,
    options: &JsonOptions,
) -> Result<JsonConversion> {
    match FileKind::from_path(file_name) {
        Ok(FileKind::Csv) => Ok(JsonConversion::Converted(convert_csv_to_json(
            CsvSource::Bytes(bytes),
            options,
        )?)),
        _ => {
            let warning = format!(
                "JSON conversion is only available for CSV files, not '{}'",
                file_name
            );
            warn!("{}", warning);
            Ok(JsonConversion::Unsupported { warning })
        }
    }
}
