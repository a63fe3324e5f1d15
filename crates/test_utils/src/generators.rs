//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating settlement drafts that
//! always pass structural validation. Amounts are whole cents; reduction
//! percentages stay within 0-100.

use core_kernel::Currency;
use domain_settlement::{
    AttorneyFeeDraft, LienDraft, LienType, LineItemDraft, ReductionMethod, SettlementDraft,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating supported currencies
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::CAD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::AUD),
    ]
}

/// Strategy for non-negative amounts up to 10 million, in cents
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for percentage points between 0 and 100, two decimal places
pub fn percentage_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|basis| Decimal::new(basis, 2))
}

pub fn reduction_method_strategy() -> impl Strategy<Value = ReductionMethod> {
    prop_oneof![Just(ReductionMethod::Percentage), Just(ReductionMethod::ProRata)]
}

pub fn attorney_fee_strategy() -> impl Strategy<Value = AttorneyFeeDraft> {
    prop_oneof![
        amount_strategy().prop_map(AttorneyFeeDraft::specific),
        percentage_strategy().prop_map(AttorneyFeeDraft::percentage),
    ]
}

/// Strategy for a fully specified line item
pub fn line_item_strategy() -> impl Strategy<Value = LineItemDraft> {
    (
        amount_strategy(),
        reduction_method_strategy(),
        percentage_strategy(),
        any::<bool>(),
    )
        .prop_map(|(amount, method, value, in_pool)| {
            let item = LineItemDraft::new("Creditor", amount).in_pool(in_pool);
            match method {
                ReductionMethod::Percentage => item.percentage(value),
                ReductionMethod::ProRata => item.prorata(),
            }
        })
}

pub fn lien_strategy() -> impl Strategy<Value = LienDraft> {
    (
        line_item_strategy(),
        prop_oneof![Just(LienType::Health), Just(LienType::Other)],
    )
        .prop_map(|(item, lien_type)| LienDraft::new(item, lien_type))
}

/// Strategy for a complete settlement draft with up to five items per category
pub fn settlement_draft_strategy() -> impl Strategy<Value = SettlementDraft> {
    (
        currency_strategy(),
        amount_strategy(),
        amount_strategy(),
        attorney_fee_strategy(),
        amount_strategy(),
        prop::collection::vec(line_item_strategy(), 0..5),
        prop::collection::vec(line_item_strategy(), 0..5),
        prop::collection::vec(lien_strategy(), 0..5),
    )
        .prop_map(
            |(currency, gross, expenses, fee, medical_payment, medical, loans, liens)| {
                let mut draft = SettlementDraft::new(gross, expenses, fee, medical_payment);
                draft.currency = Some(currency);
                draft.medical_providers = medical;
                draft.pre_settlement_loans = loans;
                draft.liens = liens;
                draft
            },
        )
}
