//! Core library for OCR receipt field extraction.
//!
//! This crate provides:
//! - OCR JSON document loading
//! - Pattern-based receipt field extraction (date, address, receipt number)
//! - Subtotal/total reconciliation and line item correlation
//! - Receipt record serialization and output file naming

pub mod document;
pub mod error;
pub mod models;
pub mod output;
pub mod receipt;

pub use document::{load_receipt_text, OcrDocument};
pub use error::{DocumentError, ExtractionError, Result, TiqueteError};
pub use models::config::TiqueteConfig;
pub use models::receipt::{LineItem, ReceiptRecord};
pub use output::{output_file_name, write_record};
pub use receipt::{ExtractionResult, FieldExtractor, PatternReceiptParser, ReceiptParser};
