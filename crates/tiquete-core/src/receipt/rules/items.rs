//! Line item reconstruction.
//!
//! OCR emits the description column and the price column of a receipt as two
//! separate runs of text. They are scanned independently and paired up by
//! position in [`correlate_positionally`].

use tracing::trace;

use crate::error::ExtractionError;
use crate::models::receipt::LineItem;

use super::patterns::{search_all, ITEM_DESCRIPTION, PRICE_BLOCK, SUBTOTAL_MARKER};

/// A product code and description as printed; `sku` is empty for the
/// `SUBTOTAL` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDescription<'t> {
    pub sku: &'t str,
    pub description: &'t str,
}

impl<'t> RawDescription<'t> {
    pub fn new(sku: &'t str, description: &'t str) -> Self {
        Self { sku, description }
    }
}

/// An amount and its tax code as printed; `tax_code` is empty when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPrice<'t> {
    pub amount: &'t str,
    pub tax_code: &'t str,
}

impl<'t> RawPrice<'t> {
    pub fn new(amount: &'t str, tax_code: &'t str) -> Self {
        Self { amount, tax_code }
    }
}

/// Scan item descriptions and the `SUBTOTAL` marker, in print order.
pub fn extract_raw_descriptions(text: &str) -> Vec<RawDescription<'_>> {
    ITEM_DESCRIPTION
        .captures_iter(text)
        .filter_map(|caps| match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(sku), Some(description), _)
                if !sku.as_str().is_empty() && !description.as_str().is_empty() =>
            {
                Some(RawDescription::new(sku.as_str(), description.as_str()))
            }
            (_, _, Some(marker)) => Some(RawDescription::new("", marker.as_str())),
            _ => None,
        })
        .collect()
}

/// Scan price blocks and split them into amount/tax code pairs.
pub fn extract_raw_prices(text: &str) -> Vec<RawPrice<'_>> {
    search_all(&PRICE_BLOCK, text)
        .into_iter()
        .flat_map(|block| block.split('\n'))
        .filter(|line| !line.is_empty() && *line != " ")
        .map(|line| {
            if line.contains(' ') {
                let mut parts = line.split(' ');
                let amount = parts.next().unwrap_or_default();
                let tax_code = parts.next().unwrap_or_default();
                RawPrice::new(amount, tax_code)
            } else {
                RawPrice::new(line, "")
            }
        })
        .collect()
}

/// Best-effort positional correlation of descriptions and prices.
///
/// The i-th description is paired with the i-th price. Descriptions beyond
/// the shorter list, the `SUBTOTAL` marker, and pairs whose code or amount
/// is not a plain digit string are dropped. There is no correlating key: a
/// missed or extra token on either side shifts every following pair.
pub fn correlate_positionally(
    descriptions: &[RawDescription<'_>],
    prices: &[RawPrice<'_>],
) -> Result<Vec<LineItem>, ExtractionError> {
    descriptions
        .iter()
        .zip(prices)
        .filter(|(d, _)| d.description != SUBTOTAL_MARKER)
        .filter(|(d, p)| {
            let numeric = is_digits(d.sku) && is_digits(p.amount);
            if !numeric {
                trace!("Skipping malformed item {:?} / {:?}", d, p);
            }
            numeric
        })
        .map(|(d, p)| -> Result<LineItem, ExtractionError> {
            Ok(LineItem {
                sku: parse_field(d.sku, "line_items.sku")?,
                description: d.description.to_string(),
                total: parse_field(p.amount, "line_items.total")?,
                tax_code: p.tax_code.to_string(),
            })
        })
        .collect()
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_field(value: &str, field: &'static str) -> Result<i64, ExtractionError> {
    value.parse().map_err(|_| ExtractionError::Parse {
        field,
        value: value.to_string(),
    })
}
