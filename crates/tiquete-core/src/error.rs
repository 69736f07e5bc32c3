//! Error types for the tiquete-core library.

use thiserror::Error;

/// Main error type for the tiquete library.
#[derive(Error, Debug)]
pub enum TiqueteError {
    /// Receipt field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// OCR document error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to receipt field extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A required single-match pattern found nothing.
    #[error("no match for required field: {field}")]
    NotFound { field: &'static str },

    /// A matched token could not be coerced to a number.
    #[error("failed to parse {field}: {value:?}")]
    Parse { field: &'static str, value: String },
}

impl ExtractionError {
    /// Name of the field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NotFound { field } | Self::Parse { field, .. } => field,
        }
    }
}

/// Errors related to the OCR JSON envelope.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document is not valid OCR JSON.
    #[error("invalid OCR document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document contains no pages.
    #[error("OCR document has no pages")]
    NoPages,

    /// Requested page is out of range.
    #[error("invalid page index: {0}")]
    InvalidPage(usize),
}

/// Result type for the tiquete library.
pub type Result<T> = std::result::Result<T, TiqueteError>;
