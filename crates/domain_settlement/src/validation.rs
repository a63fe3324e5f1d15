//! Settlement validation
//!
//! The first of the two phases: a [`SettlementDraft`] becomes a typed,
//! consistent [`Settlement`] or is rejected as malformed input.
//!
//! # Rules
//!
//! ## Rejected
//! - Missing gross amount, case expenses, attorney fee, fee amount, or medical payment
//! - A line item without an amount
//! - Any amount above [`MAX_AMOUNT`] or percentage above [`MAX_PERCENTAGE_POINTS`]
//!   in magnitude, in every mode
//! - A pro-rata item whose share of the pool exceeds [`MAX_AMOUNT`]
//!
//! ## Filled in
//! - Missing reduction method or value: the category default
//! - Missing pool membership: included
//! - Missing lien type: health
//! - Missing currency: USD
//!
//! ## Warned (rejected only in [`ValidationMode::Strict`])
//! - Percentage reduction value outside 0-100
//! - Attorney fee percentage outside 0-100
//! - Negative amounts
//! - Blank creditor name

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use core_kernel::{Currency, LineItemId, Money, SettlementId};
use crate::draft::{AttorneyFeeBasis, AttorneyFeeDraft, LineItemDraft, SettlementDraft};
use crate::error::SettlementError;
use crate::reduction::ReductionPool;
use crate::settlement::{
    AttorneyFee, CategoryDefaults, CreditorCategory, Lien, LineItem, ReductionMethod, Settlement,
};

/// Largest accepted amount magnitude
///
/// Keeps every intermediate of the calculation inside the decimal range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Largest accepted percentage magnitude, for fees and reductions alike
pub const MAX_PERCENTAGE_POINTS: Decimal = dec!(1000000);

/// How out-of-range values are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Accept and report as warnings; the arithmetic runs on them unchanged
    #[default]
    Permissive,
    /// Reject the settlement on the first warning
    Strict,
}

/// A value that is structurally valid but outside its expected range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    ReductionValueOutOfRange { field: String, value: Decimal },
    AttorneyPercentageOutOfRange { field: String, value: Decimal },
    NegativeAmount { field: String, value: Decimal },
    BlankCreditor { field: String },
}

impl ValidationWarning {
    /// Path of the offending field
    pub fn field(&self) -> &str {
        match self {
            ValidationWarning::ReductionValueOutOfRange { field, .. }
            | ValidationWarning::AttorneyPercentageOutOfRange { field, .. }
            | ValidationWarning::NegativeAmount { field, .. }
            | ValidationWarning::BlankCreditor { field } => field,
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::ReductionValueOutOfRange { field, value } => {
                write!(f, "{field}: reduction percentage {value} is outside 0-100")
            }
            ValidationWarning::AttorneyPercentageOutOfRange { field, value } => {
                write!(f, "{field}: attorney fee percentage {value} is outside 0-100")
            }
            ValidationWarning::NegativeAmount { field, value } => {
                write!(f, "{field}: amount {value} is negative")
            }
            ValidationWarning::BlankCreditor { field } => {
                write!(f, "{field}: creditor name is blank")
            }
        }
    }
}

/// A settlement that passed validation, with any range warnings
#[derive(Debug, Clone)]
pub struct ValidatedSettlement {
    pub settlement: Settlement,
    pub warnings: Vec<ValidationWarning>,
}

/// Validates a draft into a [`Settlement`]
///
/// # Errors
///
/// Returns a malformed-input [`SettlementError`] if a required field is
/// missing, or, in strict mode, if any value is out of range.
pub fn validate(
    draft: SettlementDraft,
    mode: ValidationMode,
) -> Result<ValidatedSettlement, SettlementError> {
    let mut validator = Validator {
        currency: draft.currency.unwrap_or_default(),
        warnings: Vec::new(),
    };

    let gross = validator.amount(draft.total_settlement_amount, "total_settlement_amount")?;
    let case_expenses = validator.amount(draft.case_expenses, "case_expenses")?;
    let medical_payment = validator.amount(draft.medical_payment, "medical_payment")?;
    let attorney_fee = validator.attorney_fee(draft.attorney_fee)?;

    let defaults = draft.category_defaults;
    let medical_providers = validator.line_items(
        draft.medical_providers,
        CreditorCategory::Medical,
        &defaults,
    )?;
    let pre_settlement_loans = validator.line_items(
        draft.pre_settlement_loans,
        CreditorCategory::Loans,
        &defaults,
    )?;

    let mut liens = Vec::with_capacity(draft.liens.len());
    for (index, lien) in draft.liens.into_iter().enumerate() {
        let item = validator.line_item(lien.item, CreditorCategory::Liens, index, &defaults)?;
        liens.push(Lien {
            item,
            lien_type: lien.lien_type.unwrap_or_default(),
        });
    }

    let Validator { currency, warnings } = validator;

    if mode == ValidationMode::Strict {
        if let Some(first) = warnings.first() {
            return Err(SettlementError::OutOfRange(first.to_string()));
        }
    }
    for warning in &warnings {
        warn!(field = %warning.field(), "{}", warning);
    }

    let settlement = Settlement::from_parts(
        draft.id.unwrap_or_else(SettlementId::new_v7),
        currency,
        gross,
        case_expenses,
        attorney_fee,
        medical_payment,
        medical_providers,
        pre_settlement_loans,
        liens,
        defaults,
    );
    check_prorata_shares(&settlement)?;

    debug!(
        settlement_id = %settlement.id(),
        line_items = settlement.line_item_count(),
        warnings = warnings.len(),
        "Settlement validated"
    );

    Ok(ValidatedSettlement { settlement, warnings })
}

struct Validator {
    currency: Currency,
    warnings: Vec<ValidationWarning>,
}

impl Validator {
    fn amount(&mut self, value: Option<Decimal>, field: &str) -> Result<Money, SettlementError> {
        let value = value.ok_or_else(|| SettlementError::MissingField(field.to_string()))?;
        if value.abs() > MAX_AMOUNT {
            return Err(SettlementError::OutOfRange(format!(
                "{field}: amount {value} exceeds the maximum of {MAX_AMOUNT}"
            )));
        }
        if value.is_sign_negative() && !value.is_zero() {
            self.warnings.push(ValidationWarning::NegativeAmount {
                field: field.to_string(),
                value,
            });
        }
        Ok(Money::new(value, self.currency))
    }

    fn attorney_fee(&mut self, draft: Option<AttorneyFeeDraft>) -> Result<AttorneyFee, SettlementError> {
        let draft = draft.ok_or_else(|| SettlementError::MissingField("attorney_fee".to_string()))?;
        match draft.basis {
            AttorneyFeeBasis::Specific => {
                let fee = self.amount(draft.amount, "attorney_fee.amount")?;
                Ok(AttorneyFee::Specific(fee))
            }
            AttorneyFeeBasis::Percentage => {
                let points = draft
                    .amount
                    .ok_or_else(|| SettlementError::MissingField("attorney_fee.amount".to_string()))?;
                check_points(points, "attorney_fee.amount")?;
                if !is_percentage(points) {
                    self.warnings.push(ValidationWarning::AttorneyPercentageOutOfRange {
                        field: "attorney_fee.amount".to_string(),
                        value: points,
                    });
                }
                Ok(AttorneyFee::Percentage(points))
            }
        }
    }

    fn line_items(
        &mut self,
        drafts: Vec<LineItemDraft>,
        category: CreditorCategory,
        defaults: &CategoryDefaults,
    ) -> Result<Vec<LineItem>, SettlementError> {
        drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| self.line_item(draft, category, index, defaults))
            .collect()
    }

    fn line_item(
        &mut self,
        draft: LineItemDraft,
        category: CreditorCategory,
        index: usize,
        defaults: &CategoryDefaults,
    ) -> Result<LineItem, SettlementError> {
        let path = format!("{}[{}]", category.field_name(), index);
        let amount = self.amount(draft.amount, &format!("{path}.amount"))?;

        if draft.creditor.trim().is_empty() {
            self.warnings.push(ValidationWarning::BlankCreditor {
                field: format!("{path}.creditor"),
            });
        }

        let fallback = defaults.for_category(category);
        let reduction_method = draft.reduction_method.unwrap_or(fallback.method);
        let reduction_value = draft.reduction_value.unwrap_or(fallback.value);
        check_points(reduction_value, &format!("{path}.reduction_value"))?;

        if reduction_method == ReductionMethod::Percentage && !is_percentage(reduction_value) {
            self.warnings.push(ValidationWarning::ReductionValueOutOfRange {
                field: format!("{path}.reduction_value"),
                value: reduction_value,
            });
        }

        Ok(LineItem {
            id: draft.id.unwrap_or_else(LineItemId::new_v7),
            creditor: draft.creditor,
            email: draft.email,
            amount,
            reduction_method,
            reduction_value,
            include_in_prorata_pool: draft.include_in_prorata_pool.unwrap_or(true),
        })
    }
}

fn check_points(points: Decimal, field: &str) -> Result<(), SettlementError> {
    if points.abs() > MAX_PERCENTAGE_POINTS {
        return Err(SettlementError::OutOfRange(format!(
            "{field}: percentage {points} exceeds the maximum of {MAX_PERCENTAGE_POINTS}"
        )));
    }
    Ok(())
}

/// Rejects pro-rata items whose pool share cannot be apportioned
///
/// A share grows without bound as total damages approaches zero, e.g. when
/// negative items cancel the positive ones.
fn check_prorata_shares(settlement: &Settlement) -> Result<(), SettlementError> {
    let pool = ReductionPool::from_settlement(settlement);
    let categories = [
        (CreditorCategory::Medical, settlement.medical_providers().iter().collect::<Vec<_>>()),
        (CreditorCategory::Loans, settlement.pre_settlement_loans().iter().collect()),
        (CreditorCategory::Liens, settlement.liens().iter().map(|lien| &lien.item).collect()),
    ];

    for (category, items) in categories {
        for (index, item) in items.into_iter().enumerate() {
            if item.reduction_method != ReductionMethod::ProRata {
                continue;
            }
            let within_range = match pool.checked_share_of(&item.amount) {
                Ok(Some(share)) => share.amount().abs() <= MAX_AMOUNT,
                Ok(None) => true,
                Err(_) => false,
            };
            if !within_range {
                return Err(SettlementError::OutOfRange(format!(
                    "{}[{}].amount: pro-rata share of the pool exceeds the maximum of {MAX_AMOUNT}",
                    category.field_name(),
                    index
                )));
            }
        }
    }
    Ok(())
}

fn is_percentage(value: Decimal) -> bool {
    value >= dec!(0) && value <= dec!(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::LienDraft;
    use crate::settlement::{LienType, ReductionPolicy};

    fn base_draft() -> SettlementDraft {
        SettlementDraft::new(
            dec!(9000),
            dec!(500),
            AttorneyFeeDraft::percentage(dec!(33)),
            dec!(0),
        )
    }

    #[test]
    fn test_missing_gross_is_rejected() {
        let mut draft = base_draft();
        draft.total_settlement_amount = None;

        let err = validate(draft, ValidationMode::Permissive).unwrap_err();
        assert!(matches!(&err, SettlementError::MissingField(f) if f == "total_settlement_amount"));
        assert!(err.to_string().starts_with("invalid settlement structure"));
    }

    #[test]
    fn test_missing_attorney_fee_is_rejected() {
        let mut draft = base_draft();
        draft.attorney_fee = None;

        assert!(matches!(
            validate(draft, ValidationMode::Permissive),
            Err(SettlementError::MissingField(_))
        ));
    }

    #[test]
    fn test_missing_line_item_amount_names_the_item() {
        let mut draft = base_draft();
        draft.pre_settlement_loans.push(LineItemDraft::new("Lender", dec!(10)));
        draft.pre_settlement_loans.push(LineItemDraft {
            creditor: "No amount".to_string(),
            ..LineItemDraft::default()
        });

        let err = validate(draft, ValidationMode::Permissive).unwrap_err();
        assert!(matches!(&err, SettlementError::MissingField(f) if f == "pre_settlement_loans[1].amount"));
    }

    #[test]
    fn test_category_default_fills_missing_policy() {
        let mut draft = base_draft();
        draft.category_defaults = CategoryDefaults::default()
            .with(CreditorCategory::Loans, ReductionPolicy::prorata());
        draft.pre_settlement_loans.push(LineItemDraft::new("Lender", dec!(1000)));
        draft.medical_providers.push(LineItemDraft::new("Clinic", dec!(1000)));

        let validated = validate(draft, ValidationMode::Permissive).unwrap();
        let settlement = validated.settlement;
        assert_eq!(settlement.pre_settlement_loans()[0].reduction_method, ReductionMethod::ProRata);
        assert_eq!(settlement.medical_providers()[0].reduction_method, ReductionMethod::Percentage);
        assert_eq!(settlement.medical_providers()[0].reduction_value, dec!(0));
    }

    #[test]
    fn test_pool_membership_and_lien_type_defaults() {
        let mut draft = base_draft();
        draft.liens.push(LienDraft {
            item: LineItemDraft::new("Medicare", dec!(700)),
            lien_type: None,
        });

        let settlement = validate(draft, ValidationMode::Permissive).unwrap().settlement;
        assert!(settlement.liens()[0].item.include_in_prorata_pool);
        assert_eq!(settlement.liens()[0].lien_type, LienType::Health);
        assert_eq!(settlement.currency(), Currency::USD);
    }

    #[test]
    fn test_out_of_range_percentage_passes_through_in_permissive_mode() {
        let mut draft = base_draft();
        draft.medical_providers.push(LineItemDraft::new("Clinic", dec!(1000)).percentage(dec!(150)));

        let validated = validate(draft, ValidationMode::Permissive).unwrap();
        assert_eq!(validated.settlement.medical_providers()[0].reduction_value, dec!(150));
        assert_eq!(
            validated.warnings,
            vec![ValidationWarning::ReductionValueOutOfRange {
                field: "medical_providers[0].reduction_value".to_string(),
                value: dec!(150),
            }]
        );
    }

    #[test]
    fn test_out_of_range_percentage_rejected_in_strict_mode() {
        let mut draft = base_draft();
        draft.medical_providers.push(LineItemDraft::new("Clinic", dec!(1000)).percentage(dec!(-5)));

        let err = validate(draft, ValidationMode::Strict).unwrap_err();
        assert!(matches!(err, SettlementError::OutOfRange(_)));
    }

    #[test]
    fn test_prorata_value_is_not_range_checked() {
        let mut draft = base_draft();
        let mut item = LineItemDraft::new("Clinic", dec!(1000)).prorata();
        item.reduction_value = Some(dec!(400));
        draft.medical_providers.push(item);

        let validated = validate(draft, ValidationMode::Strict).unwrap();
        assert!(validated.warnings.is_empty());
    }

    #[test]
    fn test_negative_amount_and_blank_creditor_warn() {
        let mut draft = base_draft();
        draft.case_expenses = Some(dec!(-10));
        draft.liens.push(LienDraft::new(LineItemDraft::new("  ", dec!(5)), LienType::Other));

        let validated = validate(draft, ValidationMode::Permissive).unwrap();
        let fields: Vec<&str> = validated.warnings.iter().map(|w| w.field()).collect();
        assert_eq!(fields, vec!["case_expenses", "liens[0].creditor"]);
    }

    #[test]
    fn test_existing_ids_are_kept() {
        let id = SettlementId::new();
        let mut draft = base_draft();
        draft.id = Some(id);

        let settlement = validate(draft, ValidationMode::Permissive).unwrap().settlement;
        assert_eq!(settlement.id(), id);
    }
}
