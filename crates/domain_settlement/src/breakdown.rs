//! Settlement breakdown produced by the engine

use serde::Serialize;

use core_kernel::{Currency, LineItemId, Money, SettlementId};
use crate::settlement::{CreditorCategory, LienType, LineItem, ReductionMethod};

/// Reduction outcome for one line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReductionResult {
    pub item_id: LineItemId,
    pub creditor: String,
    pub method: ReductionMethod,
    pub include_in_prorata_pool: bool,
    /// Set for liens only
    pub lien_type: Option<LienType>,
    pub amount: Money,
    pub reduction: Money,
    /// Always `amount - reduction`
    pub final_amount: Money,
}

impl ReductionResult {
    pub fn new(item: &LineItem, reduction: Money) -> Self {
        Self {
            item_id: item.id,
            creditor: item.creditor.clone(),
            method: item.reduction_method,
            include_in_prorata_pool: item.include_in_prorata_pool,
            lien_type: None,
            amount: item.amount,
            reduction,
            final_amount: item.amount - reduction,
        }
    }

    pub fn with_lien_type(mut self, lien_type: LienType) -> Self {
        self.lien_type = Some(lien_type);
        self
    }
}

/// Per-category totals and items, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub category: CreditorCategory,
    /// Sum of reductions
    pub total_reduction: Money,
    /// Sum of final amounts still owed
    pub total_final: Money,
    pub items: Vec<ReductionResult>,
}

impl CategoryBreakdown {
    pub fn from_results(
        category: CreditorCategory,
        currency: Currency,
        items: Vec<ReductionResult>,
    ) -> Self {
        let (total_reduction, total_final) = items.iter().fold(
            (Money::zero(currency), Money::zero(currency)),
            |(reduction, fin), r| (reduction + r.reduction, fin + r.final_amount),
        );

        Self {
            category,
            total_reduction,
            total_final,
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Fully itemized result of a settlement calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementBreakdown {
    pub settlement_id: SettlementId,
    pub currency: Currency,
    pub gross_settlement: Money,
    pub case_expenses: Money,
    pub attorney_fee_amount: Money,
    pub medical_payment: Money,
    /// Pro-rata denominator
    pub total_damages: Money,
    /// Pro-rata pool (one third of gross)
    pub reduction_pool: Money,
    /// May be negative; see [`SettlementBreakdown::is_feasible`]
    pub net_proceeds: Money,
    pub medical: CategoryBreakdown,
    pub loans: CategoryBreakdown,
    pub liens: CategoryBreakdown,
}

impl SettlementBreakdown {
    /// False when the client would owe money after everything is paid
    pub fn is_feasible(&self) -> bool {
        !self.net_proceeds.is_negative()
    }

    pub fn category(&self, category: CreditorCategory) -> &CategoryBreakdown {
        match category {
            CreditorCategory::Medical => &self.medical,
            CreditorCategory::Loans => &self.loans,
            CreditorCategory::Liens => &self.liens,
        }
    }

    /// All three categories in breakdown order
    pub fn categories(&self) -> [&CategoryBreakdown; 3] {
        [&self.medical, &self.loans, &self.liens]
    }

    /// Sum of reductions across all categories
    pub fn total_reduction(&self) -> Money {
        self.categories()
            .iter()
            .fold(Money::zero(self.currency), |acc, c| acc + c.total_reduction)
    }

    /// Amount paid out to creditors after reductions
    pub fn total_to_creditors(&self) -> Money {
        self.categories()
            .iter()
            .fold(Money::zero(self.currency), |acc, c| acc + c.total_final)
    }
}
