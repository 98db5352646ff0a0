use crate::tabular::reader::{read_csv, read_csv_bytes};
use crate::tabular::sheet::Sheet;
use crate::utils::{HeaderTranslatorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;

/// Shape of the emitted JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonOrient {
    /// `[{column: value}, ...]`
    #[default]
    Records,
    /// `{"columns": [...], "index": [...], "data": [[...], ...]}`
    Split,
    /// `{row: {column: value}}`
    Index,
    /// `{column: {row: value}}`
    Columns,
    /// `[[...], ...]`
    Values,
}

impl FromStr for JsonOrient {
    type Err = HeaderTranslatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "records" => Ok(JsonOrient::Records),
            "split" => Ok(JsonOrient::Split),
            "index" => Ok(JsonOrient::Index),
            "columns" => Ok(JsonOrient::Columns),
            "values" => Ok(JsonOrient::Values),
            other => Err(HeaderTranslatorError::ConversionError(format!(
                "unsupported orient '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonOptions {
    pub orient: JsonOrient,
    /// Spaces per nesting level; `None` renders compact JSON.
    pub indent: Option<usize>,
    /// Escape every non-ASCII character as `\uXXXX`.
    pub ascii_only: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            orient: JsonOrient::Records,
            indent: Some(4),
            ascii_only: true,
        }
    }
}

pub enum CsvSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
    Table(Sheet),
}

#[derive(Debug, Clone)]
pub struct ConvertedJson {
    pub value: JsonValue,
    pub rendered: String,
}

pub fn to_json_value(sheet: &Sheet, orient: JsonOrient) -> JsonValue {
    let headers = sheet.headers();
    let rows = sheet.row_count();

    let row_values = |row: usize| -> Vec<JsonValue> {
        sheet.row(row).into_iter().map(|cell| cell.to_json()).collect()
    };
    let row_object = |row: usize| -> JsonValue {
        let mut map = Map::with_capacity(headers.len());
        for (header, value) in headers.iter().zip(row_values(row)) {
            map.insert(header.clone(), value);
        }
        JsonValue::Object(map)
    };

    match orient {
        JsonOrient::Records => JsonValue::Array((0..rows).map(row_object).collect()),
        JsonOrient::Values => JsonValue::Array(
            (0..rows).map(|row| JsonValue::Array(row_values(row))).collect(),
        ),
        JsonOrient::Split => {
            let mut map = Map::new();
            map.insert(
                "columns".to_string(),
                JsonValue::Array(headers.iter().cloned().map(JsonValue::String).collect()),
            );
            map.insert(
                "index".to_string(),
                JsonValue::Array((0..rows).map(JsonValue::from).collect()),
            );
            map.insert(
                "data".to_string(),
                JsonValue::Array((0..rows).map(|row| JsonValue::Array(row_values(row))).collect()),
            );
            JsonValue::Object(map)
        }
        JsonOrient::Index => {
            let mut map = Map::with_capacity(rows);
            for row in 0..rows {
                map.insert(row.to_string(), row_object(row));
            }
            JsonValue::Object(map)
        }
        JsonOrient::Columns => {
            let mut map = Map::with_capacity(headers.len());
            for (col, column) in sheet.columns.iter().enumerate() {
                let mut by_row = Map::with_capacity(rows);
                for row in 0..rows {
                    by_row.insert(row.to_string(), sheet.cell(row, col).to_json());
                }
                map.insert(column.header.clone(), JsonValue::Object(by_row));
            }
            JsonValue::Object(map)
        }
    }
}

/// Render with the given indent, optionally escaping non-ASCII characters.
pub fn render_json(value: &JsonValue, indent: Option<usize>, ascii_only: bool) -> Result<String> {
    let rendered = match indent {
        None => serde_json::to_string(value)?,
        Some(width) => {
            let indent = " ".repeat(width);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
            let mut buffer = Vec::new();
            let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
            value.serialize(&mut serializer)?;
            String::from_utf8(buffer)
                .map_err(|e| HeaderTranslatorError::ConversionError(e.to_string()))?
        }
    };

    Ok(if ascii_only {
        escape_non_ascii(&rendered)
    } else {
        rendered
    })
}

/// Non-ASCII text only ever appears inside JSON strings, so escaping it
/// in the rendered output is equivalent to escaping during serialization.
fn escape_non_ascii(rendered: &str) -> String {
    let mut out = String::with_capacity(rendered.len());
    let mut units = [0u16; 2];
    for c in rendered.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{:04x}", unit);
            }
        }
    }
    out
}

fn load_source(source: CsvSource) -> Result<Sheet> {
    match source {
        CsvSource::Path(path) => read_csv(&path.to_string_lossy()),
        CsvSource::Bytes(bytes) => read_csv_bytes(&bytes, "CSV"),
        CsvSource::Table(sheet) => Ok(sheet),
    }
}

/// Parse CSV and serialize it into the requested shape.
///
/// Any failure is reported as a single `ConversionError` naming the cause;
/// nothing is returned unless the whole document rendered.
pub fn convert_csv_to_json(source: CsvSource, options: &JsonOptions) -> Result<ConvertedJson> {
    let sheet = load_source(source)
        .map_err(|e| HeaderTranslatorError::ConversionError(e.to_string()))?;
    let value = to_json_value(&sheet, options.orient);
    let rendered = render_json(&value, options.indent, options.ascii_only)
        .map_err(|e| match e {
            HeaderTranslatorError::ConversionError(_) => e,
            other => HeaderTranslatorError::ConversionError(other.to_string()),
        })?;

    tracing::debug!(
        orient = ?options.orient,
        rows = sheet.row_count(),
        bytes = rendered.len(),
        "Converted CSV to JSON"
    );

    Ok(ConvertedJson { value, rendered })
}
