//! Receipt parser wrapping the field extractor with diagnostics.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::receipt::ReceiptRecord;

use super::extractor::{FieldExtractor, ReceiptParts};
use super::rules::is_calendar_date;
use super::Result;

/// Result of receipt extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted receipt.
    pub record: ReceiptRecord,
    /// Non-fatal observations about the extraction.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for receipt parsing.
pub trait ReceiptParser {
    /// Parse a receipt from OCR text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Pattern-based receipt parser.
pub struct PatternReceiptParser {
    /// Whether to warn when the date is not a real calendar day.
    validate_date: bool,
}

impl PatternReceiptParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            validate_date: true,
        }
    }

    /// Set calendar date validation.
    pub fn with_date_validation(mut self, validate: bool) -> Self {
        self.validate_date = validate;
        self
    }

    fn collect_warnings(&self, parts: &ReceiptParts<'_>) -> Vec<String> {
        let record = &parts.record;
        let mut warnings = Vec::new();

        if self.validate_date && !is_calendar_date(&record.date) {
            warnings.push(format!("Date {} is not a valid calendar date", record.date));
        }

        if parts.descriptions.len() != parts.prices.len() {
            warnings.push(format!(
                "Found {} descriptions but {} prices; items were paired by position",
                parts.descriptions.len(),
                parts.prices.len()
            ));
        }

        if record.line_items.is_empty() {
            warnings.push("Could not extract line items".to_string());
        } else if let Some(items_total) = record.items_total() {
            if items_total != record.subtotal {
                warnings.push(format!(
                    "Line items sum to {} but subtotal is {}",
                    items_total, record.subtotal
                ));
            }
        }

        if parts.financials.discount_unconfirmed() {
            warnings.push(format!(
                "Discounts of {} found but the discounted total is not printed; using subtotal",
                parts.financials.discount_sum.saturating_neg()
            ));
        }

        warnings
    }
}

impl Default for PatternReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for PatternReceiptParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        info!("Parsing receipt from {} characters of text", text.len());

        let parts = FieldExtractor::new(text).extract_parts()?;
        let warnings = self.collect_warnings(&parts);
        let record = parts.record;

        debug!(
            "Extracted receipt {} with {} items, subtotal {}, total {}",
            record.invoice_number,
            record.line_items.len(),
            record.subtotal,
            record.total
        );

        Ok(ExtractionResult {
            record,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
