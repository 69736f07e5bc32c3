//! OCR JSON document loading.
//!
//! Only the text payload of one page is read:
//! `{ "pages": [ { "fullTextAnnotation": { "text": "..." } } ] }`.
//! Every other field of the document is ignored.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{DocumentError, Result};

/// An OCR result document.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrDocument {
    #[serde(default)]
    pub pages: Vec<OcrPage>,
}

/// A single OCR page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrPage {
    pub full_text_annotation: TextAnnotation,
}

/// Flattened text of a page.
#[derive(Debug, Clone, Deserialize)]
pub struct TextAnnotation {
    pub text: String,
}

impl OcrDocument {
    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a document from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let document = Self::from_json(&content)?;
        debug!("Loaded {} with {} pages", path.display(), document.pages.len());
        Ok(document)
    }

    /// Text of the page at `index`.
    pub fn page_text(&self, index: usize) -> std::result::Result<&str, DocumentError> {
        if self.pages.is_empty() {
            return Err(DocumentError::NoPages);
        }
        self.pages
            .get(index)
            .map(|p| p.full_text_annotation.text.as_str())
            .ok_or(DocumentError::InvalidPage(index))
    }
}

/// Load the receipt text of one page from an OCR JSON file.
pub fn load_receipt_text(path: &Path, page: usize) -> Result<String> {
    let document = OcrDocument::from_file(path)?;
    Ok(document.page_text(page)?.to_string())
}
