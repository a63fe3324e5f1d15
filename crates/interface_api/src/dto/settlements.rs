//! Settlement DTOs
//!
//! Field names are camelCase on the wire. Enum-valued fields arrive as plain
//! strings and are parsed while building the draft, so an unknown value is
//! reported as invalid settlement structure rather than a JSON syntax error.
//! Monetary amounts are JSON numbers in both directions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use core_kernel::{Currency, LineItemId};
use domain_settlement::{
    Assessment, AttorneyFee, AttorneyFeeBasis, AttorneyFeeDraft, CategoryBreakdown,
    CategoryDefaults, CreditorCategory, LienDraft, LienType, LineItem, LineItemDraft,
    ReductionMethod, ReductionPolicy, ReductionResult, Settlement, SettlementBreakdown,
    SettlementDraft, SettlementError, SettlementRecord, ValidationWarning,
};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of create, update, and calculate requests
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRequest {
    pub currency: Option<String>,
    pub total_settlement_amount: Option<Decimal>,
    pub case_expenses: Option<Decimal>,
    pub attorney_fees: Option<AttorneyFeesRequest>,
    pub medical_payment: Option<Decimal>,
    #[serde(default)]
    pub medical_providers: Vec<MedicalProviderRequest>,
    #[serde(default)]
    pub pre_settlement_loans: Vec<CreditorRequest>,
    #[serde(default)]
    pub liens: Vec<LienRequest>,
    /// Category-wide reduction defaults
    pub reductions: Option<ReductionDefaultsRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttorneyFeesRequest {
    /// `specific` or `percentage`
    #[serde(rename = "type")]
    pub fee_type: Option<String>,
    /// Flat amount or percentage points, depending on `type`
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalProviderRequest {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub billed_amount: Option<Decimal>,
    pub email: Option<String>,
    pub reduction_type: Option<String>,
    pub reduction_value: Option<Decimal>,
    pub include_in_prorata_pool: Option<bool>,
}

/// A pre-settlement loan
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditorRequest {
    pub id: Option<String>,
    #[serde(default)]
    pub provider: String,
    pub amount: Option<Decimal>,
    pub email: Option<String>,
    pub reduction_type: Option<String>,
    pub reduction_value: Option<Decimal>,
    pub include_in_prorata_pool: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LienRequest {
    pub id: Option<String>,
    #[serde(default)]
    pub provider: String,
    pub amount: Option<Decimal>,
    /// `health` or `other`
    #[serde(rename = "type")]
    pub lien_type: Option<String>,
    pub email: Option<String>,
    pub reduction_type: Option<String>,
    pub reduction_value: Option<Decimal>,
    pub include_in_prorata_pool: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReductionDefaultsRequest {
    pub medical: Option<ReductionPolicyRequest>,
    pub loans: Option<ReductionPolicyRequest>,
    pub liens: Option<ReductionPolicyRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReductionPolicyRequest {
    #[serde(rename = "type")]
    pub reduction_type: Option<String>,
    pub value: Option<Decimal>,
}

impl TryFrom<SettlementRequest> for SettlementDraft {
    type Error = SettlementError;

    fn try_from(request: SettlementRequest) -> Result<Self, Self::Error> {
        let currency = request
            .currency
            .as_deref()
            .map(Currency::from_str)
            .transpose()?;

        let attorney_fee = request
            .attorney_fees
            .map(|fees| -> Result<AttorneyFeeDraft, SettlementError> {
                let basis = fees
                    .fee_type
                    .as_deref()
                    .ok_or_else(|| SettlementError::MissingField("attorney_fee.type".to_string()))?
                    .parse::<AttorneyFeeBasis>()?;
                Ok(AttorneyFeeDraft {
                    basis,
                    amount: fees.amount,
                })
            })
            .transpose()?;

        let medical_providers = request
            .medical_providers
            .into_iter()
            .map(|p| {
                line_item_draft(
                    p.id,
                    p.name,
                    p.billed_amount,
                    p.email,
                    p.reduction_type,
                    p.reduction_value,
                    p.include_in_prorata_pool,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pre_settlement_loans = request
            .pre_settlement_loans
            .into_iter()
            .map(|l| {
                line_item_draft(
                    l.id,
                    l.provider,
                    l.amount,
                    l.email,
                    l.reduction_type,
                    l.reduction_value,
                    l.include_in_prorata_pool,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let liens = request
            .liens
            .into_iter()
            .map(|l| -> Result<LienDraft, SettlementError> {
                let lien_type = l.lien_type.as_deref().map(LienType::from_str).transpose()?;
                let item = line_item_draft(
                    l.id,
                    l.provider,
                    l.amount,
                    l.email,
                    l.reduction_type,
                    l.reduction_value,
                    l.include_in_prorata_pool,
                )?;
                Ok(LienDraft { item, lien_type })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let category_defaults = match request.reductions {
            Some(defaults) => CategoryDefaults {
                medical: reduction_policy(defaults.medical)?,
                loans: reduction_policy(defaults.loans)?,
                liens: reduction_policy(defaults.liens)?,
            },
            None => CategoryDefaults::default(),
        };

        Ok(SettlementDraft {
            id: None,
            currency,
            total_settlement_amount: request.total_settlement_amount,
            case_expenses: request.case_expenses,
            attorney_fee,
            medical_payment: request.medical_payment,
            medical_providers,
            pre_settlement_loans,
            liens,
            category_defaults,
        })
    }
}

fn line_item_draft(
    id: Option<String>,
    creditor: String,
    amount: Option<Decimal>,
    email: Option<String>,
    reduction_type: Option<String>,
    reduction_value: Option<Decimal>,
    include_in_prorata_pool: Option<bool>,
) -> Result<LineItemDraft, SettlementError> {
    let id = id
        .as_deref()
        .map(|raw| {
            LineItemId::from_str(raw).map_err(|_| {
                SettlementError::InvalidStructure(format!("invalid line item id '{raw}'"))
            })
        })
        .transpose()?;
    let reduction_method = reduction_type
        .as_deref()
        .map(ReductionMethod::from_str)
        .transpose()?;

    Ok(LineItemDraft {
        id,
        creditor,
        email,
        amount,
        reduction_method,
        reduction_value,
        include_in_prorata_pool,
    })
}

fn reduction_policy(request: Option<ReductionPolicyRequest>) -> Result<ReductionPolicy, SettlementError> {
    let Some(request) = request else {
        return Ok(ReductionPolicy::default());
    };
    let method = match request.reduction_type.as_deref() {
        Some(raw) => raw.parse()?,
        None => ReductionMethod::Percentage,
    };
    Ok(ReductionPolicy {
        method,
        value: request.value.unwrap_or_default(),
    })
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Result of `POST /calculate`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    pub calculated_results: BreakdownResponse,
    pub warnings: Vec<WarningResponse>,
}

impl From<&Assessment> for CalculationResponse {
    fn from(assessment: &Assessment) -> Self {
        Self {
            calculated_results: BreakdownResponse::from(&assessment.breakdown),
            warnings: assessment.warnings.iter().map(WarningResponse::from).collect(),
        }
    }
}

/// A stored settlement with its saved breakdown
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    pub id: String,
    #[serde(flatten)]
    pub settlement: SettlementView,
    pub calculated_results: BreakdownResponse,
    pub warnings: Vec<WarningResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&SettlementRecord> for SettlementResponse {
    fn from(record: &SettlementRecord) -> Self {
        Self {
            id: record.id().to_string(),
            settlement: SettlementView::from(&record.settlement),
            calculated_results: BreakdownResponse::from(&record.breakdown),
            warnings: record.warnings.iter().map(WarningResponse::from).collect(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WarningResponse {
    pub field: String,
    pub message: String,
}

impl From<&ValidationWarning> for WarningResponse {
    fn from(warning: &ValidationWarning) -> Self {
        Self {
            field: warning.field().to_string(),
            message: warning.to_string(),
        }
    }
}

/// Stored inputs, shaped like the request that produced them
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementView {
    pub currency: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_settlement_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub case_expenses: Decimal,
    pub attorney_fees: AttorneyFeesView,
    #[serde(with = "rust_decimal::serde::float")]
    pub medical_payment: Decimal,
    pub medical_providers: Vec<MedicalProviderView>,
    pub pre_settlement_loans: Vec<CreditorView>,
    pub liens: Vec<CreditorView>,
    pub reductions: ReductionDefaultsView,
}

impl From<&Settlement> for SettlementView {
    fn from(settlement: &Settlement) -> Self {
        Self {
            currency: settlement.currency().code().to_string(),
            total_settlement_amount: settlement.total_settlement_amount().amount(),
            case_expenses: settlement.case_expenses().amount(),
            attorney_fees: AttorneyFeesView::from(settlement.attorney_fee()),
            medical_payment: settlement.medical_payment().amount(),
            medical_providers: settlement
                .medical_providers()
                .iter()
                .map(MedicalProviderView::from)
                .collect(),
            pre_settlement_loans: settlement
                .pre_settlement_loans()
                .iter()
                .map(|item| CreditorView::new(item, None))
                .collect(),
            liens: settlement
                .liens()
                .iter()
                .map(|lien| CreditorView::new(&lien.item, Some(lien.lien_type)))
                .collect(),
            reductions: ReductionDefaultsView::from(settlement.category_defaults()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AttorneyFeesView {
    #[serde(rename = "type")]
    pub fee_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl From<&AttorneyFee> for AttorneyFeesView {
    fn from(fee: &AttorneyFee) -> Self {
        match fee {
            AttorneyFee::Specific(amount) => Self {
                fee_type: "specific".to_string(),
                amount: amount.amount(),
            },
            AttorneyFee::Percentage(points) => Self {
                fee_type: "percentage".to_string(),
                amount: *points,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalProviderView {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub billed_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub reduction_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub reduction_value: Decimal,
    pub include_in_prorata_pool: bool,
}

impl From<&LineItem> for MedicalProviderView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.creditor.clone(),
            billed_amount: item.amount.amount(),
            email: item.email.clone(),
            reduction_type: item.reduction_method.to_string(),
            reduction_value: item.reduction_value,
            include_in_prorata_pool: item.include_in_prorata_pool,
        }
    }
}

/// A loan or lien
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditorView {
    pub id: String,
    pub provider: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub lien_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub reduction_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub reduction_value: Decimal,
    pub include_in_prorata_pool: bool,
}

impl CreditorView {
    fn new(item: &LineItem, lien_type: Option<LienType>) -> Self {
        Self {
            id: item.id.to_string(),
            provider: item.creditor.clone(),
            amount: item.amount.amount(),
            lien_type: lien_type.map(|t| t.as_str().to_string()),
            email: item.email.clone(),
            reduction_type: item.reduction_method.to_string(),
            reduction_value: item.reduction_value,
            include_in_prorata_pool: item.include_in_prorata_pool,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReductionDefaultsView {
    pub medical: ReductionPolicyView,
    pub loans: ReductionPolicyView,
    pub liens: ReductionPolicyView,
}

impl From<&CategoryDefaults> for ReductionDefaultsView {
    fn from(defaults: &CategoryDefaults) -> Self {
        Self {
            medical: defaults.for_category(CreditorCategory::Medical).into(),
            loans: defaults.for_category(CreditorCategory::Loans).into(),
            liens: defaults.for_category(CreditorCategory::Liens).into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReductionPolicyView {
    #[serde(rename = "type")]
    pub reduction_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

impl From<ReductionPolicy> for ReductionPolicyView {
    fn from(policy: ReductionPolicy) -> Self {
        Self {
            reduction_type: policy.method.to_string(),
            value: policy.value,
        }
    }
}

/// The itemized breakdown
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownResponse {
    pub settlement_id: String,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_settlement: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub case_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub attorney_fee_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub medical_payment: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_damages: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub reduction_pool: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_proceeds: Decimal,
    pub feasible: bool,
    pub reductions: CategoryReductionsResponse,
}

impl From<&SettlementBreakdown> for BreakdownResponse {
    fn from(breakdown: &SettlementBreakdown) -> Self {
        Self {
            settlement_id: breakdown.settlement_id.to_string(),
            currency: breakdown.currency.code().to_string(),
            gross_settlement: breakdown.gross_settlement.amount(),
            case_expenses: breakdown.case_expenses.amount(),
            attorney_fee_amount: breakdown.attorney_fee_amount.amount(),
            medical_payment: breakdown.medical_payment.amount(),
            total_damages: breakdown.total_damages.amount(),
            reduction_pool: breakdown.reduction_pool.amount(),
            net_proceeds: breakdown.net_proceeds.amount(),
            feasible: breakdown.is_feasible(),
            reductions: CategoryReductionsResponse {
                medical: (&breakdown.medical).into(),
                loans: (&breakdown.loans).into(),
                liens: (&breakdown.liens).into(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryReductionsResponse {
    pub medical: CategoryResponse,
    pub loans: CategoryResponse,
    pub liens: CategoryResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    /// Sum of reductions
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Sum of final amounts
    #[serde(with = "rust_decimal::serde::float")]
    pub total_final: Decimal,
    pub per_item: Vec<ItemReductionResponse>,
}

impl From<&CategoryBreakdown> for CategoryResponse {
    fn from(category: &CategoryBreakdown) -> Self {
        Self {
            total: category.total_reduction.amount(),
            total_final: category.total_final.amount(),
            per_item: category.items.iter().map(ItemReductionResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReductionResponse {
    pub id: String,
    pub name: String,
    pub reduction_type: String,
    pub include_in_prorata_pool: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub lien_type: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub reduction: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
}

impl From<&ReductionResult> for ItemReductionResponse {
    fn from(result: &ReductionResult) -> Self {
        Self {
            id: result.item_id.to_string(),
            name: result.creditor.clone(),
            reduction_type: result.method.to_string(),
            include_in_prorata_pool: result.include_in_prorata_pool,
            lien_type: result.lien_type.map(|t| t.as_str().to_string()),
            amount: result.amount.amount(),
            reduction: result.reduction.amount(),
            final_amount: result.final_amount.amount(),
        }
    }
}
