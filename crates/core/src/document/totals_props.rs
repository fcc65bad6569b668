//! Property-based tests for document totals.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::totals::calculate_totals;
use super::types::LineItemInput;

/// Quantities and rates with two decimal places.
fn line_strategy() -> impl Strategy<Value = LineItemInput> {
    (0i64..10_000, 0i64..1_000_000)
        .prop_map(|(q, r)| LineItemInput::new("line", Decimal::new(q, 2), Decimal::new(r, 2)))
}

fn percent_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|bp| Decimal::new(bp, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// total = subtotal - discount% of subtotal + tax% of (subtotal - discount)
    #[test]
    fn prop_total_formula(
        items in prop::collection::vec(line_strategy(), 0..8),
        discount in percent_strategy(),
        tax in percent_strategy(),
    ) {
        let totals = calculate_totals(&items, discount, tax);
        let subtotal: Decimal = items.iter().map(|i| i.quantity * i.rate).sum();

        prop_assert_eq!(totals.subtotal, subtotal);
        prop_assert_eq!(totals.discount_amount, subtotal * discount / Decimal::ONE_HUNDRED);
        prop_assert_eq!(totals.taxable_amount, totals.subtotal - totals.discount_amount);
        prop_assert_eq!(
            totals.total,
            totals.subtotal - totals.discount_amount + totals.tax_amount
        );
    }

    /// With rates in 0..=100 nothing goes negative and the discount never
    /// exceeds the subtotal.
    #[test]
    fn prop_totals_bounded(
        items in prop::collection::vec(line_strategy(), 0..8),
        discount in percent_strategy(),
        tax in percent_strategy(),
    ) {
        let totals = calculate_totals(&items, discount, tax);

        prop_assert!(totals.discount_amount >= Decimal::ZERO);
        prop_assert!(totals.discount_amount <= totals.subtotal);
        prop_assert!(totals.tax_amount >= Decimal::ZERO);
        prop_assert!(totals.total >= Decimal::ZERO);
    }

    /// Line order does not change the totals.
    #[test]
    fn prop_line_order_irrelevant(
        items in prop::collection::vec(line_strategy(), 0..8),
        discount in percent_strategy(),
        tax in percent_strategy(),
    ) {
        let mut reversed = items.clone();
        reversed.reverse();

        prop_assert_eq!(
            calculate_totals(&items, discount, tax),
            calculate_totals(&reversed, discount, tax)
        );
    }
}
