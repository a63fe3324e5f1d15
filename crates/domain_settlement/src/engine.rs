//! Apportionment engine
//!
//! A pure mapping from [`Settlement`] to [`SettlementBreakdown`]. It reads its
//! input, holds no state between calls, and cannot fail: validation bounds
//! every amount, percentage and pro-rata share to
//! [`MAX_AMOUNT`](crate::validation::MAX_AMOUNT) scale, and degenerate inputs
//! produce defined (possibly negative) amounts rather than errors.

use tracing::{debug, warn};

use core_kernel::Currency;
use crate::breakdown::{CategoryBreakdown, ReductionResult, SettlementBreakdown};
use crate::reduction::{reduction_for, ReductionPool};
use crate::settlement::{CreditorCategory, LineItem, Settlement};

/// Calculates the full settlement breakdown
///
/// Net proceeds are
/// `gross + medical payment - case expenses - attorney fee - final amounts owed`
/// across medical providers, loans, and liens.
pub fn calculate(settlement: &Settlement) -> SettlementBreakdown {
    let currency = settlement.currency();
    let pool = ReductionPool::from_settlement(settlement);

    debug!(
        settlement_id = %settlement.id(),
        total_damages = %pool.total_damages().amount(),
        reduction_pool = %pool.pool().amount(),
        "Computed pro-rata pool"
    );

    let medical = apportion(
        CreditorCategory::Medical,
        currency,
        settlement.medical_providers().iter(),
        &pool,
    );
    let loans = apportion(
        CreditorCategory::Loans,
        currency,
        settlement.pre_settlement_loans().iter(),
        &pool,
    );
    let liens = CategoryBreakdown::from_results(
        CreditorCategory::Liens,
        currency,
        settlement
            .liens()
            .iter()
            .map(|lien| {
                ReductionResult::new(&lien.item, reduction_for(&lien.item, &pool))
                    .with_lien_type(lien.lien_type)
            })
            .collect(),
    );

    let gross = *settlement.total_settlement_amount();
    let attorney_fee_amount = settlement.attorney_fee().amount_for(&gross);

    let net_proceeds = gross + *settlement.medical_payment()
        - *settlement.case_expenses()
        - attorney_fee_amount
        - medical.total_final
        - loans.total_final
        - liens.total_final;

    if net_proceeds.is_negative() {
        warn!(
            settlement_id = %settlement.id(),
            net_proceeds = %net_proceeds.amount(),
            "Settlement is infeasible: net proceeds are negative"
        );
    }

    SettlementBreakdown {
        settlement_id: settlement.id(),
        currency,
        gross_settlement: gross,
        case_expenses: *settlement.case_expenses(),
        attorney_fee_amount,
        medical_payment: *settlement.medical_payment(),
        total_damages: pool.total_damages(),
        reduction_pool: pool.pool(),
        net_proceeds,
        medical,
        loans,
        liens,
    }
}

fn apportion<'a>(
    category: CreditorCategory,
    currency: Currency,
    items: impl Iterator<Item = &'a LineItem>,
    pool: &ReductionPool,
) -> CategoryBreakdown {
    let results = items
        .map(|item| ReductionResult::new(item, reduction_for(item, pool)))
        .collect();
    CategoryBreakdown::from_results(category, currency, results)
}

impl Settlement {
    /// Shorthand for [`calculate`]
    pub fn calculate(&self) -> SettlementBreakdown {
        calculate(self)
    }
}
