//! Pass-through codec options.
//!
//! Options are plain string pairs. The engine merges them and hands them to
//! the codec without looking at them; each codec decides what it accepts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

/// Codec-specific key/value options (e.g. `delimiter`, `lineterminator`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodecOptions(BTreeMap<String, String>);

impl CodecOptions {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder form of [`CodecOptions::set`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Raw option value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Whether no options are set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over options in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Layer these options over `defaults`; values set here win
    pub fn merged_over(&self, defaults: &CodecOptions) -> CodecOptions {
        let mut merged = defaults.clone();
        for (name, value) in &self.0 {
            merged.0.insert(name.clone(), value.clone());
        }
        merged
    }

    /// Boolean option (`true`/`false`/`1`/`0`/`yes`/`no`)
    pub fn get_bool(&self, name: &str, default: bool) -> Result<bool> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                other => Err(CodecError::InvalidOption {
                    name: name.to_string(),
                    message: format!("expected a boolean, got '{}'", other),
                }),
            },
        }
    }

    /// Single-byte option such as a delimiter or quote character
    pub fn get_byte(&self, name: &str) -> Result<Option<u8>> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => match value.as_bytes() {
                [byte] => Ok(Some(*byte)),
                _ => Err(CodecError::InvalidOption {
                    name: name.to_string(),
                    message: format!("expected a single byte, got '{}'", value.escape_default()),
                }),
            },
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CodecOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = CodecOptions::new();
        for (name, value) in iter {
            options.set(name, value);
        }
        options
    }
}
