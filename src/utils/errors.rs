use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeaderTranslatorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    #[error("xlsx write error: {0}")]
    XlsxWriteError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("JSON conversion failed: {0}")]
    ConversionError(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl From<calamine::Error> for HeaderTranslatorError {
    fn from(e: calamine::Error) -> Self {
        HeaderTranslatorError::SpreadsheetError(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for HeaderTranslatorError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        HeaderTranslatorError::XlsxWriteError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HeaderTranslatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_error_carries_cause() {
        let err = HeaderTranslatorError::ConversionError("unequal row length at line 3".into());
        assert_eq!(
            err.to_string(),
            "JSON conversion failed: unequal row length at line 3"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let err: HeaderTranslatorError = io.into();
        assert!(matches!(err, HeaderTranslatorError::IoError(_)));
    }
}
