use crate::tabular::sheet::{CellValue, Sheet, Workbook};
use crate::utils::{HeaderTranslatorError, Result};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use std::collections::HashSet;
use std::io::Write;

/// Excel sheet name maximum length.
pub const SHEET_NAME_MAX_LEN: usize = 31;
/// Characters not allowed in sheet names.
pub const SHEET_NAME_ILLEGAL: [char; 7] = ['*', ':', '?', '/', '\\', '[', ']'];

pub fn write_csv<W: Write>(sheet: &Sheet, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(sheet.headers())?;

    for row in 0..sheet.row_count() {
        let fields: Vec<String> = sheet.row(row).into_iter().map(CellValue::to_field).collect();
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(())
}

/// UTF-8 CSV bytes for one sheet.
pub fn csv_bytes(sheet: &Sheet) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(sheet, &mut buffer)?;
    Ok(buffer)
}

/// Excel rejects names that start or end with an apostrophe.
fn is_edge_char(c: char) -> bool {
    c == '\'' || c.is_whitespace()
}

/// Replace illegal characters, fall back to `Sheet` for blank names, clip to 31 characters.
pub fn sanitize_sheet_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if SHEET_NAME_ILLEGAL.contains(&c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_matches(is_edge_char);

    if trimmed.eq_ignore_ascii_case("history") {
        // Reserved by Excel.
        return "History_".to_string();
    }

    let clipped: String = trimmed.chars().take(SHEET_NAME_MAX_LEN).collect();
    let clipped = clipped.trim_end_matches(is_edge_char);
    if clipped.is_empty() {
        "Sheet".to_string()
    } else {
        clipped.to_string()
    }
}

/// Sheet names as they will appear in the exported workbook.
///
/// Names are sanitized and truncated first, then any case-insensitive clash is
/// resolved with the `.N` suffix rule, shortening the base so the result still
/// fits in 31 characters.
pub fn export_sheet_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut result = Vec::with_capacity(names.len());

    for name in names {
        let base = sanitize_sheet_name(name.as_ref());
        if taken.insert(base.to_lowercase()) {
            result.push(base);
            continue;
        }

        let mut n = 1usize;
        loop {
            let suffix = format!(".{n}");
            let keep = SHEET_NAME_MAX_LEN.saturating_sub(suffix.chars().count());
            let stem: String = base.chars().take(keep).collect();
            let candidate = format!("{}{}", stem.trim_end_matches(is_edge_char), suffix);
            if taken.insert(candidate.to_lowercase()) {
                if candidate != base {
                    tracing::debug!(sheet = %name.as_ref(), exported = %candidate, "Renamed sheet on export");
                }
                result.push(candidate);
                break;
            }
            n += 1;
        }
    }

    result
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, header_format: &Format) -> Result<()> {
    for (col, header) in sheet.headers().iter().enumerate() {
        let col = column_index(col)?;
        worksheet.write_string_with_format(0, col, header, header_format)?;
    }

    for row in 0..sheet.row_count() {
        let xlsx_row = u32::try_from(row + 1).map_err(|_| {
            HeaderTranslatorError::XlsxWriteError(format!("row {} exceeds worksheet limit", row + 1))
        })?;
        for (col, value) in sheet.row(row).into_iter().enumerate() {
            let col = column_index(col)?;
            match value {
                CellValue::Empty => {}
                CellValue::Bool(b) => {
                    worksheet.write_boolean(xlsx_row, col, *b)?;
                }
                CellValue::Int(i) => {
                    worksheet.write_number(xlsx_row, col, *i as f64)?;
                }
                CellValue::Float(f) => {
                    worksheet.write_number(xlsx_row, col, *f)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(xlsx_row, col, s)?;
                }
            }
        }
    }

    Ok(())
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| {
        HeaderTranslatorError::XlsxWriteError(format!("column {col} exceeds worksheet limit"))
    })
}

fn build_workbook(workbook: &Workbook) -> Result<XlsxWorkbook> {
    let mut xlsx = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();
    let names = export_sheet_names(&workbook.sheet_names());

    for (sheet, name) in workbook.sheets.iter().zip(names) {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(&name)?;
        write_sheet(worksheet, sheet, &header_format)?;
    }

    Ok(xlsx)
}

/// Serialize a workbook to xlsx bytes.
pub fn workbook_bytes(workbook: &Workbook) -> Result<Vec<u8>> {
    let mut xlsx = build_workbook(workbook)?;
    Ok(xlsx.save_to_buffer()?)
}

pub fn save_workbook(workbook: &Workbook, path: &str) -> Result<()> {
    let mut xlsx = build_workbook(workbook)?;
    xlsx.save(path)?;
    Ok(())
}
