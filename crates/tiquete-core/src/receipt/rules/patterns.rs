//! Regex patterns for receipt field extraction.
//!
//! Patterns that need to exclude a marker from the returned text do so with
//! capture group 1; [`search_first`] and [`search_all`] return group 1 when
//! the pattern has one and the whole match otherwise.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ExtractionError;

lazy_static! {
    // Receipt date: a line that is exactly DD/DD/DDDD
    pub static ref DATE_LINE: Regex = Regex::new(
        r"(?m)^(?:\d{2}/){2}\d{4}$"
    ).unwrap();

    // Store address: everything from the start of the text up to the first
    // line that is exactly VENDEDOR
    pub static ref ADDRESS_BLOCK: Regex = Regex::new(
        r"(?ms)\A(.*?)^VENDEDOR$"
    ).unwrap();

    // Receipt number: rest of the line after "TIQUETE "
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"TIQUETE\s(.*)"
    ).unwrap();

    // Amounts printed alone on a line
    pub static ref FREESTANDING_INTEGER: Regex = Regex::new(
        r"(?m)^[0-9]+$"
    ).unwrap();

    // Discounts are printed with a trailing minus sign
    pub static ref DISCOUNT_LINE: Regex = Regex::new(
        r"(?m)^[0-9]+-$"
    ).unwrap();

    // Item description: 13-digit code + text, or the SUBTOTAL marker line.
    // Groups: 1 = code, 2 = text, 3 = marker.
    pub static ref ITEM_DESCRIPTION: Regex = Regex::new(
        r"(?m)\b(\d{13})\s(.*)\b\n|^(SUBTOTAL)\n"
    ).unwrap();

    // Price column: amounts with optional tax letter, wrapped around a run of
    // "amount tax-letter" lines
    pub static ref PRICE_BLOCK: Regex = Regex::new(
        r"(?:\b\d+\s?\w?\b\n)+(?:\b[0-9]{3,}\s\w\b\n)+(?:\b\d+\s?\w?\b\n)+"
    ).unwrap();
}

/// Literal description that marks the end of the item list.
pub const SUBTOTAL_MARKER: &str = "SUBTOTAL";

/// Phone label; the address block is cut at its first occurrence.
pub const PHONE_MARKER: &str = "TEL:";

/// Return the first match of `pattern` in `text`.
///
/// Fails with [`ExtractionError::NotFound`] naming `field` when nothing
/// matches; an absent field is never reported as an empty string.
pub fn search_first<'t>(
    pattern: &Regex,
    text: &'t str,
    field: &'static str,
) -> Result<&'t str, ExtractionError> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(0)))
        .map(|m| m.as_str())
        .ok_or(ExtractionError::NotFound { field })
}

/// Return every non-overlapping match of `pattern` in `text`, in order.
pub fn search_all<'t>(pattern: &Regex, text: &'t str) -> Vec<&'t str> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
        .map(|m| m.as_str())
        .collect()
}
