//! Scalar header fields: date, store address and receipt number.

use chrono::NaiveDate;

use crate::error::ExtractionError;

use super::patterns::{search_first, ADDRESS_BLOCK, DATE_LINE, INVOICE_NUMBER, PHONE_MARKER};

/// Extract the receipt date line verbatim.
pub fn extract_date(text: &str) -> Result<&str, ExtractionError> {
    search_first(&DATE_LINE, text, "date")
}

/// Extract the store address printed above the `VENDEDOR` line.
///
/// The block is cut at the first `TEL:` and trimmed.
pub fn extract_address(text: &str) -> Result<&str, ExtractionError> {
    let block = search_first(&ADDRESS_BLOCK, text, "store_address")?;
    let address = block.split(PHONE_MARKER).next().unwrap_or(block);
    Ok(address.trim())
}

/// Extract the receipt number following `TIQUETE`.
pub fn extract_invoice_number(text: &str) -> Result<&str, ExtractionError> {
    search_first(&INVOICE_NUMBER, text, "invoice_number")
}

/// Whether an extracted `DD/MM/YYYY` date names a real calendar day.
pub fn is_calendar_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%d/%m/%Y").is_ok()
}
