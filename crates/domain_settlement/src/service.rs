//! Settlement domain service
//!
//! Orchestrates validation, calculation, and persistence. The preview and
//! save paths share the same validation and the same [`calculate`] call, so
//! a preview always matches what would be stored.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use core_kernel::SettlementId;
use crate::breakdown::SettlementBreakdown;
use crate::draft::SettlementDraft;
use crate::engine::calculate;
use crate::error::SettlementError;
use crate::ports::{SettlementRecord, SettlementRepository};
use crate::settlement::Settlement;
use crate::validation::{validate, ValidationMode, ValidationWarning};

/// Result of validating and calculating a draft without storing it
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub settlement: Settlement,
    pub breakdown: SettlementBreakdown,
    pub warnings: Vec<ValidationWarning>,
}

/// Service for calculating and storing settlements
#[derive(Clone)]
pub struct SettlementService {
    repository: Arc<dyn SettlementRepository>,
    mode: ValidationMode,
}

impl SettlementService {
    /// Creates a service in permissive validation mode
    pub fn new(repository: Arc<dyn SettlementRepository>) -> Self {
        Self {
            repository,
            mode: ValidationMode::Permissive,
        }
    }

    /// Sets the validation mode
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Validates and calculates a draft; nothing is stored
    pub fn preview(&self, draft: SettlementDraft) -> Result<Assessment, SettlementError> {
        let validated = validate(draft, self.mode)?;
        let breakdown = calculate(&validated.settlement);

        Ok(Assessment {
            settlement: validated.settlement,
            breakdown,
            warnings: validated.warnings,
        })
    }

    /// Validates, calculates, and stores a new settlement
    pub async fn create(&self, draft: SettlementDraft) -> Result<SettlementRecord, SettlementError> {
        let assessment = self.preview(draft)?;
        let now = Utc::now();
        let record = SettlementRecord {
            settlement: assessment.settlement,
            breakdown: assessment.breakdown,
            warnings: assessment.warnings,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert(record.clone()).await?;
        info!(
            settlement_id = %record.id(),
            net_proceeds = %record.breakdown.net_proceeds.amount(),
            "Settlement created"
        );
        Ok(record)
    }

    /// Replaces a stored settlement and recalculates its breakdown
    ///
    /// The breakdown is always recomputed from the submitted draft, so the
    /// stored result can never lag behind the stored inputs.
    pub async fn update(
        &self,
        id: SettlementId,
        mut draft: SettlementDraft,
    ) -> Result<SettlementRecord, SettlementError> {
        let existing = self.repository.get(id).await?;

        draft.id = Some(id);
        let assessment = self.preview(draft)?;
        let record = SettlementRecord {
            settlement: assessment.settlement,
            breakdown: assessment.breakdown,
            warnings: assessment.warnings,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.repository.replace(record.clone()).await?;
        info!(
            settlement_id = %id,
            net_proceeds = %record.breakdown.net_proceeds.amount(),
            "Settlement updated"
        );
        Ok(record)
    }

    pub async fn get(&self, id: SettlementId) -> Result<SettlementRecord, SettlementError> {
        Ok(self.repository.get(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<SettlementRecord>, SettlementError> {
        Ok(self.repository.list().await?)
    }

    pub async fn delete(&self, id: SettlementId) -> Result<SettlementRecord, SettlementError> {
        let record = self.repository.remove(id).await?;
        info!(settlement_id = %id, "Settlement deleted");
        Ok(record)
    }
}
