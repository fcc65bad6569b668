//! Document arithmetic.
//!
//! Discount is applied to the subtotal first; tax is charged on what remains.
//! All amounts are exact decimals and are not rounded here.

use rust_decimal::Decimal;

use super::types::{DocumentTotals, LineItemInput};

/// Computes subtotal, discount, tax and total from line items and
/// percentage rates (e.g. `10` for 10 %).
#[must_use]
pub fn calculate_totals(
    items: &[LineItemInput],
    discount_rate: Decimal,
    tax_rate: Decimal,
) -> DocumentTotals {
    let subtotal: Decimal = items.iter().map(LineItemInput::amount).sum();
    let discount_amount = subtotal * discount_rate / Decimal::ONE_HUNDRED;
    let taxable_amount = subtotal - discount_amount;
    let tax_amount = taxable_amount * tax_rate / Decimal::ONE_HUNDRED;

    DocumentTotals {
        subtotal,
        discount_amount,
        taxable_amount,
        tax_amount,
        total: taxable_amount + tax_amount,
    }
}
