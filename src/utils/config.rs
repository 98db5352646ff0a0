use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::errors::{HeaderTranslatorError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub translation: TranslationConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    /// Header → replacement pairs applied before any backend call.
    pub overrides: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub endpoint: String,
    pub source_lang: String,
    pub target_lang: String,
    pub timeout_seconds: u64,
    pub max_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json_indent: Option<usize>,
    pub ascii_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            source_lang: "auto".to_string(),
            target_lang: "en".to_string(),
            timeout_seconds: 30,
            max_chars: 5000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_indent: Some(4),
            ascii_only: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 9527,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HeaderTranslatorError::ConfigError(format!("{path}: {e}")))?;
        toml::from_str(&content).map_err(|e| HeaderTranslatorError::ConfigError(e.to_string()))
    }

    /// Defaults when the file does not exist; a file that exists but does not
    /// parse is an error.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) if std::path::Path::new(p).exists() => Self::load_from_file(p),
            _ => Ok(Self::default()),
        }
    }
}

/// Read a JSON object of `{"original header": "replacement"}` pairs.
pub fn load_overrides(path: &str) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|_| HeaderTranslatorError::FileNotFound(path.to_string()))?;
    serde_json::from_str(&content)
        .map_err(|e| HeaderTranslatorError::ConfigError(format!("overrides file {path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [translation]
            target_lang = "en"
            timeout_seconds = 5

            [overrides]
            "Nom" = "Name"
            "#,
        )
        .unwrap();

        assert_eq!(config.translation.timeout_seconds, 5);
        assert_eq!(config.translation.source_lang, "auto");
        assert_eq!(config.translation.max_chars, 5000);
        assert_eq!(config.output.json_indent, Some(4));
        assert_eq!(config.overrides.get("Nom").map(String::as_str), Some("Name"));
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let config = AppConfig::load_or_default(Some("/definitely/not/here.toml")).unwrap();
        assert_eq!(config.server.port, 9527);
        assert!(config.overrides.is_empty());
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server]\nport = \"not a port\"\n").unwrap();

        let err = AppConfig::load_or_default(file.path().to_str()).unwrap_err();
        assert!(matches!(err, HeaderTranslatorError::ConfigError(_)));
    }

    #[test]
    fn overrides_file_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Prénom": "First name", "Âge": "Age"}}"#).unwrap();

        let map = load_overrides(file.path().to_str().unwrap()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["Âge"], "Age");
    }

    #[test]
    fn malformed_overrides_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();

        let err = load_overrides(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, HeaderTranslatorError::ConfigError(_)));
    }
}
