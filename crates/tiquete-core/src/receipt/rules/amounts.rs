//! Subtotal and total reconciliation.
//!
//! Receipts in this layout carry no labels on their amounts. The subtotal is
//! taken as the largest amount printed alone on a line; the total is the
//! subtotal minus all discount lines (`NNN-`), accepted only when that exact
//! amount is also printed alone somewhere on the receipt. Both are heuristics
//! tuned to a single layout and can silently pick the wrong number when a
//! receipt prints several large standalone amounts.

use crate::error::ExtractionError;

use super::patterns::{search_all, DISCOUNT_LINE, FREESTANDING_INTEGER};

/// Amounts derived together from one receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Financials {
    /// Every freestanding amount, in print order.
    pub numbers: Vec<i64>,
    /// Sum of discount lines, as a non-positive value.
    pub discount_sum: i64,
    /// Largest freestanding amount.
    pub subtotal: i64,
    /// Discounted subtotal if printed, otherwise the subtotal.
    pub total: i64,
}

impl Financials {
    /// Whether discounts were printed but the discounted amount was not.
    pub fn discount_unconfirmed(&self) -> bool {
        self.discount_sum != 0 && self.total == self.subtotal
    }
}

/// Derive subtotal and total from the freestanding and discount lines.
pub fn extract_financials(text: &str) -> Result<Financials, ExtractionError> {
    let numbers = search_all(&FREESTANDING_INTEGER, text)
        .into_iter()
        .map(|token| parse_amount(token, "subtotal"))
        .collect::<Result<Vec<_>, _>>()?;

    let subtotal = numbers
        .iter()
        .copied()
        .max()
        .ok_or(ExtractionError::NotFound { field: "subtotal" })?;

    let discount_sum = search_all(&DISCOUNT_LINE, text)
        .into_iter()
        .map(|token| parse_amount(token.trim_end_matches('-'), "total").map(|v| -v))
        .try_fold(0i64, |acc, v| v.map(|v| acc.saturating_add(v)))?;

    let candidate = subtotal.saturating_add(discount_sum);
    let total = if numbers.contains(&candidate) {
        candidate
    } else {
        subtotal
    };

    Ok(Financials {
        numbers,
        discount_sum,
        subtotal,
        total,
    })
}

fn parse_amount(token: &str, field: &'static str) -> Result<i64, ExtractionError> {
    token.parse().map_err(|_| ExtractionError::Parse {
        field,
        value: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_subtotal_is_largest_freestanding_amount() {
        let f = extract_financials("10\n25\n7\n").unwrap();
        assert_eq!(f.subtotal, 25);
        assert_eq!(f.total, 25);
        assert_eq!(f.numbers, vec![10, 25, 7]);
    }

    #[test]
    fn test_total_applies_printed_discount() {
        let f = extract_financials("100\n15-\n15\n85\n").unwrap();
        assert_eq!(f.subtotal, 100);
        assert_eq!(f.discount_sum, -15);
        assert_eq!(f.total, 85);
        assert!(!f.discount_unconfirmed());
    }

    #[test]
    fn test_total_falls_back_when_discounted_amount_absent() {
        let f = extract_financials("100\n15-\n15\n").unwrap();
        assert_eq!(f.total, 100);
        assert!(f.discount_unconfirmed());
    }

    #[test]
    fn test_multiple_discounts_are_summed() {
        let f = extract_financials("1000\n100-\n50-\n850\n").unwrap();
        assert_eq!(f.discount_sum, -150);
        assert_eq!(f.total, 850);
    }

    #[test]
    fn test_no_freestanding_amounts() {
        assert_eq!(
            extract_financials("1200 G\n15-\n"),
            Err(ExtractionError::NotFound { field: "subtotal" })
        );
    }

    #[test]
    fn test_overflowing_amount_is_parse_error() {
        let err = extract_financials("99999999999999999999\n").unwrap_err();
        assert_eq!(err.field(), "subtotal");
    }

    #[test]
    fn test_recomputation_is_consistent() {
        let text = "100\n15-\n85\n";
        assert_eq!(
            extract_financials(text).unwrap(),
            extract_financials(text).unwrap()
        );
    }
}
