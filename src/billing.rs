use crate::error::{Error, Result};
use crate::models::LineItem;

/// Flat sales tax applied to every invoice. Quotes are never taxed.
pub const TAX_RATE: f64 = 0.10;

/// Largest amount a single line item may carry.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// Computed money columns of an invoice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl InvoiceTotals {
    pub fn from_subtotal(subtotal: f64) -> Self {
        let tax = round_cents(subtotal * TAX_RATE);
        Self {
            subtotal,
            tax,
            total: round_cents(subtotal + tax),
        }
    }

    pub fn from_items(items: &[LineItem]) -> Result<Self> {
        let totals = Self::from_subtotal(sum_items(items)?);
        if !totals.total.is_finite() {
            return Err(Error::Validation("invoice total is out of range".to_string()));
        }
        Ok(totals)
    }
}

pub fn quote_total(items: &[LineItem]) -> Result<f64> {
    sum_items(items)
}

fn sum_items(items: &[LineItem]) -> Result<f64> {
    let sum = round_cents(items.iter().map(|item| item.amount).sum());
    if !sum.is_finite() {
        return Err(Error::Validation("item amounts add up to more than can be billed".to_string()));
    }
    Ok(sum)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parses a form amount such as `100`, `99.5` or ` 1200.00 `.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::Validation(format!("amount '{raw}' is not a number")))?;

    if !amount.is_finite() {
        return Err(Error::Validation(format!("amount '{raw}' is not a number")));
    }
    if amount.abs() > MAX_AMOUNT {
        return Err(Error::Validation(format!("amount '{raw}' is larger than {MAX_AMOUNT:.0}")));
    }

    Ok(amount)
}
