//! Test Data Builders
//!
//! Provides builder patterns for constructing settlement drafts with sensible
//! defaults. Tests specify only the fields they care about.

use core_kernel::Currency;
use domain_settlement::{
    validate, AttorneyFeeDraft, CreditorCategory, LienDraft, LienType, LineItemDraft,
    ReductionPolicy, Settlement, SettlementDraft, ValidationMode,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Builder for constructing settlement drafts
///
/// Defaults to a USD settlement of 10,000 with no expenses, no fee, no
/// medical payment, and no line items.
pub struct SettlementDraftBuilder {
    draft: SettlementDraft,
}

impl Default for SettlementDraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SettlementDraftBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            draft: SettlementDraft::new(dec!(10000), dec!(0), AttorneyFeeDraft::specific(dec!(0)), dec!(0)),
        }
    }

    /// Sets the gross settlement amount
    pub fn gross(mut self, amount: Decimal) -> Self {
        self.draft.total_settlement_amount = Some(amount);
        self
    }

    pub fn case_expenses(mut self, amount: Decimal) -> Self {
        self.draft.case_expenses = Some(amount);
        self
    }

    pub fn medical_payment(mut self, amount: Decimal) -> Self {
        self.draft.medical_payment = Some(amount);
        self
    }

    /// Attorney fee as percentage points of gross
    pub fn attorney_percentage(mut self, points: Decimal) -> Self {
        self.draft.attorney_fee = Some(AttorneyFeeDraft::percentage(points));
        self
    }

    /// Flat attorney fee
    pub fn attorney_specific(mut self, amount: Decimal) -> Self {
        self.draft.attorney_fee = Some(AttorneyFeeDraft::specific(amount));
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.draft.currency = Some(currency);
        self
    }

    /// Adds a medical provider
    pub fn medical(mut self, item: LineItemDraft) -> Self {
        self.draft.medical_providers.push(item);
        self
    }

    /// Adds a pre-settlement loan
    pub fn loan(mut self, item: LineItemDraft) -> Self {
        self.draft.pre_settlement_loans.push(item);
        self
    }

    /// Adds a lien
    pub fn lien(mut self, item: LineItemDraft, lien_type: LienType) -> Self {
        self.draft.liens.push(LienDraft::new(item, lien_type));
        self
    }

    /// Sets the default reduction policy for a category
    pub fn default_policy(mut self, category: CreditorCategory, policy: ReductionPolicy) -> Self {
        self.draft.category_defaults = self.draft.category_defaults.with(category, policy);
        self
    }

    /// Builds the draft
    pub fn build(self) -> SettlementDraft {
        self.draft
    }

    /// Builds and validates the draft in permissive mode
    ///
    /// # Panics
    ///
    /// Panics if the draft is structurally invalid
    pub fn settle(self) -> Settlement {
        validate(self.draft, ValidationMode::Permissive)
            .expect("test draft should validate")
            .settlement
    }
}
