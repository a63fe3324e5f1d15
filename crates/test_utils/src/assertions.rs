//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for settlement types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_settlement::SettlementBreakdown;
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value has exactly the given amount
pub fn assert_money_eq(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Expected {} {}, got {}",
        actual.currency().symbol(),
        expected,
        actual
    );
}

/// Asserts that money values sum to a total
///
/// # Panics
///
/// Panics if the sum doesn't equal the total
pub fn assert_money_sum_equals(parts: &[Money], total: &Money) {
    let sum = parts
        .iter()
        .fold(Money::zero(total.currency()), |acc, m| acc + *m);
    assert_eq!(
        sum.amount(),
        total.amount(),
        "Sum of parts ({}) does not equal total ({})",
        sum,
        total
    );
}

/// Asserts every structural invariant of a breakdown
///
/// - each item's final amount is its amount minus its reduction
/// - each category total is the sum of its items
/// - net proceeds reconcile with the headline figures
pub fn assert_breakdown_consistent(breakdown: &SettlementBreakdown) {
    for category in breakdown.categories() {
        for item in &category.items {
            assert_eq!(
                item.final_amount,
                item.amount - item.reduction,
                "{:?} item {} final amount does not equal amount minus reduction",
                category.category,
                item.creditor
            );
        }

        let reductions: Vec<Money> = category.items.iter().map(|i| i.reduction).collect();
        let finals: Vec<Money> = category.items.iter().map(|i| i.final_amount).collect();
        assert_money_sum_equals(&reductions, &category.total_reduction);
        assert_money_sum_equals(&finals, &category.total_final);
    }

    let expected_net = breakdown.gross_settlement + breakdown.medical_payment
        - breakdown.case_expenses
        - breakdown.attorney_fee_amount
        - breakdown.total_to_creditors();
    assert_eq!(
        breakdown.net_proceeds, expected_net,
        "Net proceeds do not reconcile with the breakdown"
    );
    assert_eq!(breakdown.is_feasible(), !breakdown.net_proceeds.is_negative());
}
