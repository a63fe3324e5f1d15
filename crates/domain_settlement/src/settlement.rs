//! Settlement aggregate and creditor line items

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{Currency, LineItemId, Money, Rate, SettlementId};
use crate::error::SettlementError;

/// How a line item's reduction is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReductionMethod {
    /// A fixed percentage of the item's amount
    Percentage,
    /// The gap between the item's amount and its share of the pro-rata pool
    ProRata,
}

impl ReductionMethod {
    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReductionMethod::Percentage => "percentage",
            ReductionMethod::ProRata => "prorata",
        }
    }
}

impl fmt::Display for ReductionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReductionMethod {
    type Err = SettlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(ReductionMethod::Percentage),
            "prorata" => Ok(ReductionMethod::ProRata),
            other => Err(SettlementError::InvalidStructure(format!(
                "unknown reduction type '{other}', expected 'percentage' or 'prorata'"
            ))),
        }
    }
}

/// Lien classification. Carried through to the breakdown; has no effect on the arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LienType {
    #[default]
    Health,
    Other,
}

impl LienType {
    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            LienType::Health => "health",
            LienType::Other => "other",
        }
    }
}

impl FromStr for LienType {
    type Err = SettlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "health" => Ok(LienType::Health),
            "other" => Ok(LienType::Other),
            other => Err(SettlementError::InvalidStructure(format!(
                "unknown lien type '{other}', expected 'health' or 'other'"
            ))),
        }
    }
}

/// The three creditor collections of a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditorCategory {
    Medical,
    Loans,
    Liens,
}

impl CreditorCategory {
    /// All categories in breakdown order
    pub const ALL: [CreditorCategory; 3] = [
        CreditorCategory::Medical,
        CreditorCategory::Loans,
        CreditorCategory::Liens,
    ];

    /// Field name used in validation messages
    pub fn field_name(&self) -> &'static str {
        match self {
            CreditorCategory::Medical => "medical_providers",
            CreditorCategory::Loans => "pre_settlement_loans",
            CreditorCategory::Liens => "liens",
        }
    }
}

/// A reduction method together with its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionPolicy {
    pub method: ReductionMethod,
    /// Percentage points; ignored for pro-rata
    pub value: Decimal,
}

impl ReductionPolicy {
    /// Percentage reduction of `value` points
    pub fn percentage(value: Decimal) -> Self {
        Self {
            method: ReductionMethod::Percentage,
            value,
        }
    }

    /// Pro-rata reduction
    pub fn prorata() -> Self {
        Self {
            method: ReductionMethod::ProRata,
            value: Decimal::ZERO,
        }
    }
}

impl Default for ReductionPolicy {
    fn default() -> Self {
        Self::percentage(dec!(0))
    }
}

/// Per-category default reduction policies
///
/// Applied during validation to line items that do not choose their own
/// reduction method or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryDefaults {
    pub medical: ReductionPolicy,
    pub loans: ReductionPolicy,
    pub liens: ReductionPolicy,
}

impl CategoryDefaults {
    /// Returns the default policy for a category
    pub fn for_category(&self, category: CreditorCategory) -> ReductionPolicy {
        match category {
            CreditorCategory::Medical => self.medical,
            CreditorCategory::Loans => self.loans,
            CreditorCategory::Liens => self.liens,
        }
    }

    /// Replaces the default policy for a category
    pub fn with(mut self, category: CreditorCategory, policy: ReductionPolicy) -> Self {
        match category {
            CreditorCategory::Medical => self.medical = policy,
            CreditorCategory::Loans => self.loans = policy,
            CreditorCategory::Liens => self.liens = policy,
        }
        self
    }
}

/// Attorney fee arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "lowercase")]
pub enum AttorneyFee {
    /// A flat fee
    Specific(Money),
    /// Percentage points of the gross settlement
    Percentage(Decimal),
}

impl AttorneyFee {
    /// Computes the fee owed on a gross settlement
    pub fn amount_for(&self, gross: &Money) -> Money {
        match self {
            AttorneyFee::Specific(fee) => *fee,
            AttorneyFee::Percentage(points) => Rate::from_percentage(*points).apply(gross),
        }
    }
}

/// A creditor claim against the settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub id: LineItemId,
    /// Provider, lender, or lienholder name
    pub creditor: String,
    pub email: Option<String>,
    /// Billed or owed amount
    pub amount: Money,
    pub reduction_method: ReductionMethod,
    pub reduction_value: Decimal,
    /// Whether the amount counts toward total damages
    pub include_in_prorata_pool: bool,
}

impl LineItem {
    /// Returns the item's reduction policy
    pub fn policy(&self) -> ReductionPolicy {
        ReductionPolicy {
            method: self.reduction_method,
            value: self.reduction_value,
        }
    }
}

/// A lien line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lien {
    pub item: LineItem,
    pub lien_type: LienType,
}

/// A validated settlement
///
/// Only produced by [`crate::validation::validate`], so every amount shares
/// the settlement's currency and every required field is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    id: SettlementId,
    currency: Currency,
    total_settlement_amount: Money,
    case_expenses: Money,
    attorney_fee: AttorneyFee,
    medical_payment: Money,
    medical_providers: Vec<LineItem>,
    pre_settlement_loans: Vec<LineItem>,
    liens: Vec<Lien>,
    category_defaults: CategoryDefaults,
}

impl Settlement {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: SettlementId,
        currency: Currency,
        total_settlement_amount: Money,
        case_expenses: Money,
        attorney_fee: AttorneyFee,
        medical_payment: Money,
        medical_providers: Vec<LineItem>,
        pre_settlement_loans: Vec<LineItem>,
        liens: Vec<Lien>,
        category_defaults: CategoryDefaults,
    ) -> Self {
        Self {
            id,
            currency,
            total_settlement_amount,
            case_expenses,
            attorney_fee,
            medical_payment,
            medical_providers,
            pre_settlement_loans,
            liens,
            category_defaults,
        }
    }

    pub fn id(&self) -> SettlementId {
        self.id
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Gross settlement amount
    pub fn total_settlement_amount(&self) -> &Money {
        &self.total_settlement_amount
    }

    pub fn case_expenses(&self) -> &Money {
        &self.case_expenses
    }

    pub fn attorney_fee(&self) -> &AttorneyFee {
        &self.attorney_fee
    }

    /// Medical payment credited back into proceeds
    pub fn medical_payment(&self) -> &Money {
        &self.medical_payment
    }

    pub fn medical_providers(&self) -> &[LineItem] {
        &self.medical_providers
    }

    pub fn pre_settlement_loans(&self) -> &[LineItem] {
        &self.pre_settlement_loans
    }

    pub fn liens(&self) -> &[Lien] {
        &self.liens
    }

    pub fn category_defaults(&self) -> &CategoryDefaults {
        &self.category_defaults
    }

    /// Iterates every line item across the three categories, in breakdown order
    pub fn line_items(&self) -> impl Iterator<Item = (CreditorCategory, &LineItem)> {
        self.medical_providers
            .iter()
            .map(|item| (CreditorCategory::Medical, item))
            .chain(
                self.pre_settlement_loans
                    .iter()
                    .map(|item| (CreditorCategory::Loans, item)),
            )
            .chain(
                self.liens
                    .iter()
                    .map(|lien| (CreditorCategory::Liens, &lien.item)),
            )
    }

    /// Number of line items across all categories
    pub fn line_item_count(&self) -> usize {
        self.medical_providers.len() + self.pre_settlement_loans.len() + self.liens.len()
    }
}
