use serde_json::Value as JsonValue;

/// Tokens a CSV loader treats as missing values.
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            CellValue::Empty => JsonValue::Null,
            CellValue::Bool(b) => JsonValue::Bool(*b),
            CellValue::Int(i) => JsonValue::from(*i),
            CellValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            CellValue::Text(s) => JsonValue::String(s.clone()),
        }
    }

    /// Field text for CSV output. Missing values become an empty field.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(true) => "True".to_string(),
            CellValue::Bool(false) => "False".to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => format!("{f:?}"),
            CellValue::Text(s) => s.clone(),
        }
    }
}

fn is_na(raw: &str) -> bool {
    NA_TOKENS.contains(&raw)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Infer one column's type from its raw CSV fields.
///
/// All-integer columns stay integers unless a value is missing, in which case
/// they widen to floats. Mixed numeric columns become floats, all-boolean
/// columns become booleans, anything else stays text.
pub fn infer_column(raw: &[String]) -> Vec<CellValue> {
    let present: Vec<&str> = raw.iter().map(String::as_str).filter(|s| !is_na(s)).collect();
    let has_missing = present.len() < raw.len();

    let cell = |s: &String, convert: &dyn Fn(&str) -> CellValue| {
        if is_na(s) {
            CellValue::Empty
        } else {
            convert(s)
        }
    };

    if present.is_empty() {
        return raw.iter().map(|_| CellValue::Empty).collect();
    }

    if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        return raw
            .iter()
            .map(|s| {
                cell(s, &|v| match v.parse::<i64>() {
                    Ok(i) if has_missing => CellValue::Float(i as f64),
                    Ok(i) => CellValue::Int(i),
                    Err(_) => CellValue::Text(v.to_string()),
                })
            })
            .collect();
    }

    if present.iter().all(|s| parse_float(s).is_some()) {
        return raw
            .iter()
            .map(|s| {
                cell(s, &|v| {
                    parse_float(v)
                        .map(CellValue::Float)
                        .unwrap_or_else(|| CellValue::Text(v.to_string()))
                })
            })
            .collect();
    }

    if present.iter().all(|s| parse_bool(s).is_some()) {
        return raw
            .iter()
            .map(|s| {
                cell(s, &|v| {
                    parse_bool(v)
                        .map(CellValue::Bool)
                        .unwrap_or_else(|| CellValue::Text(v.to_string()))
                })
            })
            .collect();
    }

    raw.iter()
        .map(|s| cell(s, &|v| CellValue::Text(v.to_string())))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(header: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            header: header.into(),
            values,
        }
    }
}

/// A named grid: one header row plus column values.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.columns
            .get(col)
            .and_then(|c| c.values.get(row))
            .unwrap_or(&CellValue::Empty)
    }

    pub fn row(&self, row: usize) -> Vec<&CellValue> {
        (0..self.columns.len()).map(|col| self.cell(row, col)).collect()
    }

    /// Replace headers positionally; values and order are untouched.
    pub fn rename_columns(&mut self, headers: Vec<String>) {
        debug_assert_eq!(headers.len(), self.columns.len());
        for (column, header) in self.columns.iter_mut().zip(headers) {
            column.header = header;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn total_columns(&self) -> usize {
        self.sheets.iter().map(Sheet::column_count).sum()
    }

    pub fn get(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn integer_column() {
        assert_eq!(
            infer_column(&raw(&["1", "3", "-7"])),
            vec![CellValue::Int(1), CellValue::Int(3), CellValue::Int(-7)]
        );
    }

    #[test]
    fn integer_column_with_missing_widens_to_float() {
        assert_eq!(
            infer_column(&raw(&["1", "", "NA"])),
            vec![CellValue::Float(1.0), CellValue::Empty, CellValue::Empty]
        );
    }

    #[test]
    fn mixed_numbers_become_float() {
        assert_eq!(
            infer_column(&raw(&["1", "2.5"])),
            vec![CellValue::Float(1.0), CellValue::Float(2.5)]
        );
    }

    #[test]
    fn booleans_and_text() {
        assert_eq!(
            infer_column(&raw(&["True", "false"])),
            vec![CellValue::Bool(true), CellValue::Bool(false)]
        );
        assert_eq!(
            infer_column(&raw(&["1", "dos"])),
            vec![CellValue::Text("1".into()), CellValue::Text("dos".into())]
        );
    }

    #[test]
    fn csv_fields_round_trip_loader_types() {
        assert_eq!(CellValue::Float(2.0).to_field(), "2.0");
        assert_eq!(CellValue::Bool(true).to_field(), "True");
        assert_eq!(CellValue::Empty.to_field(), "");
    }

    #[test]
    fn ragged_columns_read_as_empty() {
        let sheet = Sheet::new(
            "s",
            vec![
                Column::new("a", vec![CellValue::Int(1), CellValue::Int(2)]),
                Column::new("b", vec![CellValue::Int(3)]),
            ],
        );
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.cell(1, 1), &CellValue::Empty);
    }
}
