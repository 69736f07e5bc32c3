//! Receipt field extraction module.

mod extractor;
mod parser;
pub mod rules;

pub use extractor::{FieldExtractor, ReceiptParts};
pub use parser::{ExtractionResult, PatternReceiptParser, ReceiptParser};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
