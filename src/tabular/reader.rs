use crate::pipeline::dedup::dedup_names;
use crate::tabular::sheet::{infer_column, CellValue, Column, Sheet, Workbook};
use crate::utils::{is_blank, HeaderTranslatorError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::{Cursor, Read};
use std::path::Path;

/// Prefix of the names given to header cells that were left blank.
pub const UNNAMED_PREFIX: &str = "Unnamed: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Spreadsheet,
}

impl FileKind {
    pub fn from_path(path: &str) -> Result<Self> {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(FileKind::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileKind::Spreadsheet),
            _ => Err(HeaderTranslatorError::UnsupportedFile(path.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Spreadsheet => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FileKind::Csv => "text/csv",
            FileKind::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// Blank header cells become `Unnamed: {index}`, then repeated names get `.N` suffixes.
pub fn normalize_headers(raw: &[String]) -> Vec<String> {
    let named: Vec<String> = raw
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if is_blank(h) {
                format!("{UNNAMED_PREFIX}{i}")
            } else {
                h.clone()
            }
        })
        .collect();
    dedup_names(&named)
}

pub fn read_csv_from_reader<R: Read>(reader: R, name: &str) -> Result<Sheet> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let raw_headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    if raw_headers.is_empty() || (raw_headers.len() == 1 && raw_headers[0].is_empty()) {
        return Err(HeaderTranslatorError::ParseError(
            "No columns to parse from file".to_string(),
        ));
    }

    let width = raw_headers.len();
    let mut fields: Vec<Vec<String>> = vec![Vec::new(); width];

    for (index, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > width {
            return Err(HeaderTranslatorError::ParseError(format!(
                "Expected {} fields in line {}, saw {}",
                width,
                index + 2,
                record.len()
            )));
        }
        for (col, column) in fields.iter_mut().enumerate() {
            column.push(record.get(col).unwrap_or("").to_string());
        }
    }

    let columns = normalize_headers(&raw_headers)
        .into_iter()
        .zip(fields)
        .map(|(header, raw)| Column::new(header, infer_column(&raw)))
        .collect();

    Ok(Sheet::new(name, columns))
}

pub fn read_csv_bytes(bytes: &[u8], name: &str) -> Result<Sheet> {
    read_csv_from_reader(bytes, name)
}

pub fn read_csv(path: &str) -> Result<Sheet> {
    if !file_exists(path) {
        return Err(HeaderTranslatorError::FileNotFound(path.to_string()));
    }
    let file = std::fs::File::open(path)?;
    read_csv_from_reader(file, "CSV")
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

fn header_from_data(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Read every sheet of a workbook held in memory, first row as header.
pub fn read_workbook_bytes(bytes: Vec<u8>) -> Result<Workbook> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let names = workbook.sheet_names();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        let mut rows = range.rows();

        let raw_headers: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(header_from_data).collect())
            .unwrap_or_default();

        let mut values: Vec<Vec<CellValue>> = vec![Vec::new(); raw_headers.len()];
        for row in rows {
            for (col, column) in values.iter_mut().enumerate() {
                column.push(row.get(col).map(cell_from_data).unwrap_or(CellValue::Empty));
            }
        }

        let columns = normalize_headers(&raw_headers)
            .into_iter()
            .zip(values)
            .map(|(header, values)| Column::new(header, values))
            .collect();

        tracing::debug!(sheet = %name, "Loaded sheet");
        sheets.push(Sheet::new(name, columns));
    }

    Ok(Workbook::new(sheets))
}

pub fn read_workbook(path: &str) -> Result<Workbook> {
    if !file_exists(path) {
        return Err(HeaderTranslatorError::FileNotFound(path.to_string()));
    }
    read_workbook_bytes(std::fs::read(path)?)
}

pub fn file_exists(path: &str) -> bool {
    Path::new(path).exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_by_extension() {
        assert_eq!(FileKind::from_path("data.CSV").unwrap(), FileKind::Csv);
        assert_eq!(FileKind::from_path("book.xlsx").unwrap(), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_path("old.xls").unwrap(), FileKind::Spreadsheet);
        assert!(matches!(
            FileKind::from_path("notes.txt"),
            Err(HeaderTranslatorError::UnsupportedFile(_))
        ));
    }

    #[test]
    fn blank_and_repeated_headers_are_normalized() {
        let raw: Vec<String> = ["Nom", "", "Nom", "  "].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            normalize_headers(&raw),
            vec!["Nom", "Unnamed: 1", "Nom.1", "Unnamed: 3"]
        );
    }

    #[test]
    fn reads_and_infers_csv() {
        let sheet = read_csv_bytes(b"a,b,c\n1,x,1.5\n3,,2\n", "CSV").unwrap();

        assert_eq!(sheet.headers(), vec!["a", "b", "c"]);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.cell(1, 0), &CellValue::Int(3));
        assert_eq!(sheet.cell(1, 1), &CellValue::Empty);
        assert_eq!(sheet.cell(1, 2), &CellValue::Float(2.0));
    }

    #[test]
    fn short_rows_are_padded() {
        let sheet = read_csv_bytes(b"a,b\n1\n2,3\n", "CSV").unwrap();
        assert_eq!(sheet.cell(0, 1), &CellValue::Empty);
        assert_eq!(sheet.cell(1, 1), &CellValue::Float(3.0));
    }

    #[test]
    fn long_rows_are_rejected() {
        let err = read_csv_bytes(b"a,b\n1,2,3\n", "CSV").unwrap_err();
        assert!(err.to_string().contains("Expected 2 fields in line 2, saw 3"));
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        assert!(matches!(
            read_csv_bytes(b"", "CSV"),
            Err(HeaderTranslatorError::ParseError(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_csv("/no/such/file.csv"),
            Err(HeaderTranslatorError::FileNotFound(_))
        ));
    }

    #[test]
    fn garbage_workbook_is_an_error() {
        assert!(read_workbook_bytes(b"not a spreadsheet".to_vec()).is_err());
    }
}
