//! Engine settings.
//!
//! Settings supply codec option defaults and source behaviour. Per-request
//! codec options override the defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tabio_codecs::CodecOptions;

use crate::error::Result;

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Delimited-text defaults
    pub csv: CsvSettings,
    /// URL source settings
    pub http: HttpSettings,
    /// Native source settings
    pub native: NativeSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Codec option defaults derived from these settings
    pub fn codec_defaults(&self) -> CodecOptions {
        let csv = &self.csv;
        let mut options = CodecOptions::new()
            .with("lineterminator", csv.lineterminator.as_str())
            .with("auto_detect_int", csv.auto_detect_int.to_string())
            .with("auto_detect_float", csv.auto_detect_float.to_string());
        if let Some(delimiter) = &csv.delimiter {
            options.set("delimiter", delimiter.as_str());
        }
        if let Some(quotechar) = &csv.quotechar {
            options.set("quotechar", quotechar.as_str());
        }
        options
    }
}

/// Delimited-text defaults
///
/// `delimiter` is unset by default so `csv` and `tsv` keep their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    pub delimiter: Option<String>,
    pub quotechar: Option<String>,
    pub lineterminator: String,
    pub auto_detect_int: bool,
    pub auto_detect_float: bool,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            delimiter: None,
            quotechar: None,
            lineterminator: "\r\n".to_string(),
            auto_detect_int: true,
            auto_detect_float: true,
        }
    }
}

/// URL source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header
    pub user_agent: String,
}

impl HttpSettings {
    /// Timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("tabio/{}", crate::VERSION),
        }
    }
}

/// Native source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeSettings {
    /// Name given to sheets read from records, columns, and arrays
    pub sheet_name: String,
}

impl Default for NativeSettings {
    fn default() -> Self {
        Self {
            sheet_name: "tabio sheet".to_string(),
        }
    }
}
