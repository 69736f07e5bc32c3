//! Field extractor over a single receipt's OCR text.

use regex::Regex;

use crate::models::receipt::{LineItem, ReceiptRecord};

use super::rules::{self, Financials, RawDescription, RawPrice};
use super::Result;

/// A record together with the intermediate scans it was built from.
#[derive(Debug, Clone)]
pub struct ReceiptParts<'t> {
    pub record: ReceiptRecord,
    pub financials: Financials,
    pub descriptions: Vec<RawDescription<'t>>,
    pub prices: Vec<RawPrice<'t>>,
}

/// Derives a [`ReceiptRecord`] from one receipt's OCR text.
///
/// Holds no state besides the borrowed text, so every operation can be
/// called in any order and any number of times with the same result.
#[derive(Debug, Clone, Copy)]
pub struct FieldExtractor<'t> {
    text: &'t str,
}

impl<'t> FieldExtractor<'t> {
    pub fn new(text: &'t str) -> Self {
        Self { text }
    }

    /// The OCR text this extractor reads.
    pub fn text(&self) -> &'t str {
        self.text
    }

    pub fn search_first(&self, pattern: &Regex, field: &'static str) -> Result<&'t str> {
        rules::search_first(pattern, self.text, field)
    }

    pub fn search_all(&self, pattern: &Regex) -> Vec<&'t str> {
        rules::search_all(pattern, self.text)
    }

    pub fn extract_date(&self) -> Result<&'t str> {
        rules::extract_date(self.text)
    }

    pub fn extract_address(&self) -> Result<&'t str> {
        rules::extract_address(self.text)
    }

    pub fn extract_invoice_number(&self) -> Result<&'t str> {
        rules::extract_invoice_number(self.text)
    }

    /// Numbers, subtotal and total computed as one unit.
    pub fn extract_financials(&self) -> Result<Financials> {
        rules::extract_financials(self.text)
    }

    pub fn extract_subtotal(&self) -> Result<i64> {
        self.extract_financials().map(|f| f.subtotal)
    }

    pub fn extract_total(&self) -> Result<i64> {
        self.extract_financials().map(|f| f.total)
    }

    pub fn extract_raw_descriptions(&self) -> Vec<RawDescription<'t>> {
        rules::extract_raw_descriptions(self.text)
    }

    pub fn extract_raw_prices(&self) -> Vec<RawPrice<'t>> {
        rules::extract_raw_prices(self.text)
    }

    pub fn build_line_items(&self) -> Result<Vec<LineItem>> {
        rules::correlate_positionally(
            &self.extract_raw_descriptions(),
            &self.extract_raw_prices(),
        )
    }

    /// Run every extractor and assemble the record.
    ///
    /// The first failing field aborts construction; there are no partial
    /// records.
    pub fn build_record(&self) -> Result<ReceiptRecord> {
        self.extract_parts().map(|parts| parts.record)
    }

    /// Like [`build_record`](Self::build_record), keeping the financials and
    /// raw item scans.
    pub fn extract_parts(&self) -> Result<ReceiptParts<'t>> {
        let date = self.extract_date()?;
        let store_address = self.extract_address()?;
        let invoice_number = self.extract_invoice_number()?;
        let financials = self.extract_financials()?;
        let descriptions = self.extract_raw_descriptions();
        let prices = self.extract_raw_prices();
        let line_items = rules::correlate_positionally(&descriptions, &prices)?;

        let record = ReceiptRecord {
            date: date.to_string(),
            store_address: store_address.to_string(),
            invoice_number: invoice_number.to_string(),
            subtotal: financials.subtotal,
            total: financials.total,
            line_items,
        };

        Ok(ReceiptParts {
            record,
            financials,
            descriptions,
            prices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use pretty_assertions::assert_eq;

    const RECEIPT: &str = "SUPER AHORRO\n\
AV CENTRAL 12\n\
TEL: 2222-3333\n\
VENDEDOR\n\
MARIA\n\
TIQUETE 00045\n\
03/02/2021\n\
7441001234567 ARROZ 1KG\n\
7441009876543 FRIJOL ROJO\n\
SUBTOTAL\n\
1200 G\n\
800 G\n\
2000\n\
500-\n\
1500\n\
GRACIAS\n";

    #[test]
    fn test_build_record() {
        let record = FieldExtractor::new(RECEIPT).build_record().unwrap();

        assert_eq!(
            record,
            ReceiptRecord {
                date: "03/02/2021".to_string(),
                store_address: "SUPER AHORRO\nAV CENTRAL 12".to_string(),
                invoice_number: "00045".to_string(),
                subtotal: 2000,
                total: 1500,
                line_items: vec![
                    LineItem {
                        sku: 7441001234567,
                        description: "ARROZ 1KG".to_string(),
                        total: 1200,
                        tax_code: "G".to_string(),
                    },
                    LineItem {
                        sku: 7441009876543,
                        description: "FRIJOL ROJO".to_string(),
                        total: 800,
                        tax_code: "G".to_string(),
                    },
                ],
            }
        );
    }

    #[test]
    fn test_build_record_is_idempotent() {
        let extractor = FieldExtractor::new(RECEIPT);
        assert_eq!(
            extractor.build_record().unwrap(),
            extractor.build_record().unwrap()
        );
    }

    #[test]
    fn test_total_does_not_depend_on_call_order() {
        let extractor = FieldExtractor::new(RECEIPT);
        assert_eq!(extractor.extract_total().unwrap(), 1500);
        assert_eq!(extractor.extract_subtotal().unwrap(), 2000);
    }

    #[test]
    fn test_extract_parts_keeps_scans() {
        let parts = FieldExtractor::new(RECEIPT).extract_parts().unwrap();

        assert_eq!(parts.descriptions.len(), 3);
        assert_eq!(parts.prices.len(), 3);
        assert_eq!(parts.financials.numbers, vec![2000, 1500]);
        assert_eq!(parts.record.line_items.len(), 2);
    }

    #[test]
    fn test_search_helpers() {
        use crate::receipt::rules::{DISCOUNT_LINE, FREESTANDING_INTEGER, INVOICE_NUMBER};

        let extractor = FieldExtractor::new(RECEIPT);
        assert_eq!(
            extractor.search_first(&INVOICE_NUMBER, "invoice_number"),
            Ok("00045")
        );
        assert_eq!(
            extractor.search_all(&FREESTANDING_INTEGER),
            vec!["2000", "1500"]
        );
        assert_eq!(extractor.search_all(&DISCOUNT_LINE), vec!["500-"]);
    }

    #[test]
    fn test_missing_scalar_aborts_record() {
        let text = RECEIPT.replace("03/02/2021\n", "");
        assert_eq!(
            FieldExtractor::new(&text).build_record(),
            Err(ExtractionError::NotFound { field: "date" })
        );
    }

    #[test]
    fn test_record_without_items() {
        let text = "TIENDA\nVENDEDOR\nTIQUETE 7\n01/01/2022\n350\n";
        let record = FieldExtractor::new(text).build_record().unwrap();

        assert!(record.line_items.is_empty());
        assert_eq!(record.subtotal, 350);
        assert_eq!(record.total, 350);
    }
}
