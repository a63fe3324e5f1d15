//! Unvalidated settlement input
//!
//! A draft mirrors what a caller submits: any field may be missing. Enum
//! values are already typed here; the boundary layer parses them with the
//! `FromStr` impls so an unknown value surfaces as a malformed-input error.

use rust_decimal::Decimal;
use std::str::FromStr;

use core_kernel::{Currency, LineItemId, SettlementId};
use crate::error::SettlementError;
use crate::settlement::{CategoryDefaults, LienType, ReductionMethod};

/// Whether an attorney fee is a flat amount or a share of the gross
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttorneyFeeBasis {
    Specific,
    Percentage,
}

impl FromStr for AttorneyFeeBasis {
    type Err = SettlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "specific" => Ok(AttorneyFeeBasis::Specific),
            "percentage" => Ok(AttorneyFeeBasis::Percentage),
            other => Err(SettlementError::InvalidStructure(format!(
                "unknown attorney fee type '{other}', expected 'specific' or 'percentage'"
            ))),
        }
    }
}

/// Attorney fee as submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttorneyFeeDraft {
    pub basis: AttorneyFeeBasis,
    pub amount: Option<Decimal>,
}

impl AttorneyFeeDraft {
    pub fn specific(amount: Decimal) -> Self {
        Self {
            basis: AttorneyFeeBasis::Specific,
            amount: Some(amount),
        }
    }

    pub fn percentage(points: Decimal) -> Self {
        Self {
            basis: AttorneyFeeBasis::Percentage,
            amount: Some(points),
        }
    }
}

/// A creditor line item as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItemDraft {
    /// Kept when re-validating a stored item
    pub id: Option<LineItemId>,
    pub creditor: String,
    pub email: Option<String>,
    pub amount: Option<Decimal>,
    /// Falls back to the category default
    pub reduction_method: Option<ReductionMethod>,
    /// Falls back to the category default
    pub reduction_value: Option<Decimal>,
    /// Defaults to `true`
    pub include_in_prorata_pool: Option<bool>,
}

impl LineItemDraft {
    /// Creates a draft with a creditor and amount, leaving policy to the defaults
    pub fn new(creditor: impl Into<String>, amount: Decimal) -> Self {
        Self {
            creditor: creditor.into(),
            amount: Some(amount),
            ..Self::default()
        }
    }

    /// Reduces the item by a fixed percentage
    pub fn percentage(mut self, points: Decimal) -> Self {
        self.reduction_method = Some(ReductionMethod::Percentage);
        self.reduction_value = Some(points);
        self
    }

    /// Reduces the item pro-rata
    pub fn prorata(mut self) -> Self {
        self.reduction_method = Some(ReductionMethod::ProRata);
        self
    }

    /// Sets pool membership
    pub fn in_pool(mut self, include: bool) -> Self {
        self.include_in_prorata_pool = Some(include);
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A lien as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LienDraft {
    pub item: LineItemDraft,
    /// Defaults to [`LienType::Health`]
    pub lien_type: Option<LienType>,
}

impl LienDraft {
    pub fn new(item: LineItemDraft, lien_type: LienType) -> Self {
        Self {
            item,
            lien_type: Some(lien_type),
        }
    }
}

/// A settlement as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementDraft {
    /// Kept when re-validating a stored settlement
    pub id: Option<SettlementId>,
    /// Defaults to USD
    pub currency: Option<Currency>,
    pub total_settlement_amount: Option<Decimal>,
    pub case_expenses: Option<Decimal>,
    pub attorney_fee: Option<AttorneyFeeDraft>,
    pub medical_payment: Option<Decimal>,
    pub medical_providers: Vec<LineItemDraft>,
    pub pre_settlement_loans: Vec<LineItemDraft>,
    pub liens: Vec<LienDraft>,
    pub category_defaults: CategoryDefaults,
}

impl SettlementDraft {
    /// Creates a draft with every required field present and no line items
    pub fn new(
        total_settlement_amount: Decimal,
        case_expenses: Decimal,
        attorney_fee: AttorneyFeeDraft,
        medical_payment: Decimal,
    ) -> Self {
        Self {
            total_settlement_amount: Some(total_settlement_amount),
            case_expenses: Some(case_expenses),
            attorney_fee: Some(attorney_fee),
            medical_payment: Some(medical_payment),
            ..Self::default()
        }
    }
}
