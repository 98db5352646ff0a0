pub mod json;
pub mod reader;
pub mod sheet;
pub mod writer;

pub use json::{convert_csv_to_json, to_json_value, ConvertedJson, CsvSource, JsonOptions, JsonOrient};
pub use reader::{read_csv, read_csv_bytes, read_workbook, read_workbook_bytes, FileKind, UNNAMED_PREFIX};
pub use sheet::{CellValue, Column, Sheet, Workbook};
pub use writer::{csv_bytes, export_sheet_names, save_workbook, workbook_bytes};
