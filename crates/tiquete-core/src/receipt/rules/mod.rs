//! Rule-based field extractors for OCR receipts.

pub mod amounts;
pub mod header;
pub mod items;
pub mod patterns;

pub use amounts::{extract_financials, Financials};
pub use header::{extract_address, extract_date, extract_invoice_number, is_calendar_date};
pub use items::{
    correlate_positionally, extract_raw_descriptions, extract_raw_prices, RawDescription,
    RawPrice,
};
pub use patterns::*;
