//! Pro-rata reduction pool and per-item reduction policy

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use core_kernel::{Money, MoneyError, Rate};
use crate::settlement::{LineItem, ReductionMethod, Settlement};

/// The pool is one third of the gross settlement, regardless of how many
/// categories or items take part.
pub const POOL_DIVISOR: Decimal = dec!(3);

/// Shared pro-rata figures, computed once per calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReductionPool {
    total_damages: Money,
    pool: Money,
}

impl ReductionPool {
    pub fn new(total_damages: Money, pool: Money) -> Self {
        Self { total_damages, pool }
    }

    /// Builds the pool for a settlement
    ///
    /// Total damages sums every pool-eligible item across all three
    /// categories. An item's own reduction method plays no part in this.
    pub fn from_settlement(settlement: &Settlement) -> Self {
        let total_damages = settlement
            .line_items()
            .filter(|(_, item)| item.include_in_prorata_pool)
            .fold(Money::zero(settlement.currency()), |acc, (_, item)| acc + item.amount);

        Self {
            total_damages,
            pool: *settlement.total_settlement_amount() / POOL_DIVISOR,
        }
    }

    /// Sum of pool-eligible item amounts
    pub fn total_damages(&self) -> Money {
        self.total_damages
    }

    /// One third of the gross settlement
    pub fn pool(&self) -> Money {
        self.pool
    }

    /// Proportional share of the pool for an amount
    ///
    /// `None` when total damages is not positive, i.e. there is nothing to
    /// distribute against.
    pub fn share_of(&self, amount: &Money) -> Option<Money> {
        self.checked_share_of(amount).ok().flatten()
    }

    /// [`share_of`](Self::share_of), reporting overflow instead of hiding it
    pub fn checked_share_of(&self, amount: &Money) -> Result<Option<Money>, MoneyError> {
        if !self.total_damages.is_positive() {
            return Ok(None);
        }
        let ratio = amount.ratio(&self.total_damages)?;
        self.pool.checked_mul(ratio).map(Some)
    }
}

/// Computes the reduction for one line item
///
/// Percentage items lose `value`% of their amount, unbounded. Pro-rata
/// items are reduced to their share of the pool; pool membership only
/// affects the denominator, so an excluded item selecting pro-rata is
/// still reduced against the other members' total.
pub fn reduction_for(item: &LineItem, pool: &ReductionPool) -> Money {
    match item.reduction_method {
        ReductionMethod::Percentage => Rate::from_percentage(item.reduction_value).apply(&item.amount),
        ReductionMethod::ProRata => match pool.share_of(&item.amount) {
            Some(share) => item.amount - share,
            None => Money::zero(item.amount.currency()),
        },
    }
}
