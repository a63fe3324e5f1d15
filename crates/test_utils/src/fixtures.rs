//! Pre-built Test Fixtures
//!
//! Worked settlement scenarios with hand-checked figures. Each scenario is
//! available as a domain draft and as the equivalent JSON request body.

use domain_settlement::{LienType, LineItemDraft, SettlementDraft};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use crate::builders::SettlementDraftBuilder;

/// Fixture for settlement scenarios
pub struct SettlementFixtures;

impl SettlementFixtures {
    /// Percentage reductions only
    ///
    /// Gross 10,000, expenses 500, fee 33% (3,300), medical payment 250.
    /// Medical 1,000 at 20% owes 800; loan 500 at 0% owes 500; health lien
    /// 400 at 50% owes 200. Net proceeds are 4,950.
    pub fn percentage_only() -> SettlementDraft {
        SettlementDraftBuilder::new()
            .gross(dec!(10000))
            .case_expenses(dec!(500))
            .attorney_percentage(dec!(33))
            .medical_payment(dec!(250))
            .medical(LineItemDraft::new("City Hospital", dec!(1000)).percentage(dec!(20)))
            .loan(LineItemDraft::new("Lawsuit Funding Co", dec!(500)).percentage(dec!(0)))
            .lien(LineItemDraft::new("State Medicaid", dec!(400)).percentage(dec!(50)), LienType::Health)
            .build()
    }

    pub fn percentage_only_json() -> Value {
        json!({
            "totalSettlementAmount": 10000,
            "caseExpenses": 500,
            "attorneyFees": { "type": "percentage", "amount": 33 },
            "medicalPayment": 250,
            "medicalProviders": [
                { "name": "City Hospital", "billedAmount": 1000, "reductionType": "percentage", "reductionValue": 20 }
            ],
            "preSettlementLoans": [
                { "provider": "Lawsuit Funding Co", "amount": 500, "reductionType": "percentage", "reductionValue": 0 }
            ],
            "liens": [
                { "provider": "State Medicaid", "amount": 400, "type": "health", "reductionType": "percentage", "reductionValue": 50 }
            ]
        })
    }

    /// Two pro-rata medical providers
    ///
    /// Gross 9,000 makes a pool of 3,000 against damages of 4,000. The
    /// 3,000 bill is reduced by 750, the 1,000 bill by 250. Net proceeds
    /// are 6,000.
    pub fn prorata_pair() -> SettlementDraft {
        SettlementDraftBuilder::new()
            .gross(dec!(9000))
            .medical(LineItemDraft::new("Orthopedics", dec!(3000)).prorata())
            .medical(LineItemDraft::new("Physical Therapy", dec!(1000)).prorata())
            .build()
    }

    pub fn prorata_pair_json() -> Value {
        json!({
            "totalSettlementAmount": 9000,
            "caseExpenses": 0,
            "attorneyFees": { "type": "specific", "amount": 0 },
            "medicalPayment": 0,
            "medicalProviders": [
                { "name": "Orthopedics", "billedAmount": 3000, "reductionType": "prorata" },
                { "name": "Physical Therapy", "billedAmount": 1000, "reductionType": "prorata" }
            ]
        })
    }

    /// Creditors exceed what the settlement can pay
    ///
    /// Gross 1,000, expenses 2,000, flat fee 300, one unreduced 3,000 bill.
    /// Net proceeds are -4,300.
    pub fn infeasible() -> SettlementDraft {
        SettlementDraftBuilder::new()
            .gross(dec!(1000))
            .case_expenses(dec!(2000))
            .attorney_specific(dec!(300))
            .medical(LineItemDraft::new("Trauma Center", dec!(3000)))
            .build()
    }

    pub fn infeasible_json() -> Value {
        json!({
            "totalSettlementAmount": 1000,
            "caseExpenses": 2000,
            "attorneyFees": { "type": "specific", "amount": 300 },
            "medicalPayment": 0,
            "medicalProviders": [
                { "name": "Trauma Center", "billedAmount": 3000 }
            ]
        })
    }
}
