//! Configuration structures for receipt processing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::TiqueteError;

/// Main configuration for the tiquete pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TiqueteConfig {
    /// OCR document configuration.
    pub document: DocumentConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// OCR document configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Index of the page whose text is extracted.
    pub page: usize,
}

/// Output file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receipts are written to.
    pub directory: PathBuf,

    /// File name prefix, suffixed with the invoice number.
    pub file_prefix: String,

    /// File extension (without the dot).
    pub extension: String,

    /// JSON indentation width in spaces.
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_prefix: "sample".to_string(),
            extension: "json".to_string(),
            indent: 4,
        }
    }
}

impl TiqueteConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, TiqueteError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| TiqueteError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), TiqueteError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
