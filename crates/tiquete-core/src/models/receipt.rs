//! Receipt data model.

use serde::{Deserialize, Serialize};

/// A complete receipt extracted from OCR text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRecord {
    /// Receipt date, verbatim as printed (`DD/MM/YYYY`).
    pub date: String,

    /// Store address block printed above the seller line.
    pub store_address: String,

    /// Receipt number following the `TIQUETE` marker.
    pub invoice_number: String,

    /// Largest freestanding amount on the receipt.
    pub subtotal: i64,

    /// Subtotal after discounts, when the discounted amount is printed.
    pub total: i64,

    /// Items in print order.
    pub line_items: Vec<LineItem>,
}

/// A single purchased item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// 13-digit product code.
    pub sku: i64,

    /// Item description.
    pub description: String,

    /// Line amount.
    pub total: i64,

    /// Single-letter tax category, empty when not printed.
    pub tax_code: String,
}

impl ReceiptRecord {
    /// Sum of all line item amounts, `None` if it overflows.
    pub fn items_total(&self) -> Option<i64> {
        self.line_items
            .iter()
            .try_fold(0i64, |acc, item| acc.checked_add(item.total))
    }

    /// Amount deducted from the subtotal.
    pub fn discount(&self) -> i64 {
        self.subtotal - self.total
    }
}
