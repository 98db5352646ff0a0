pub mod config;
pub mod errors;

pub use config::{load_overrides, AppConfig, LoggingConfig, OutputConfig, TranslationConfig};
pub use errors::{HeaderTranslatorError, Result};

/// Missing headers: empty or whitespace-only after trimming.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
