//! Settlement repository port
//!
//! Storage is an external collaborator: adapters persist a settlement
//! together with its authoritative breakdown and hand it back by identifier.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use core_kernel::{DomainPort, PortError, SettlementId};
use crate::breakdown::SettlementBreakdown;
use crate::settlement::Settlement;
use crate::validation::ValidationWarning;

/// A stored settlement and the breakdown computed when it was saved
#[derive(Debug, Clone, Serialize)]
pub struct SettlementRecord {
    pub settlement: Settlement,
    pub breakdown: SettlementBreakdown,
    pub warnings: Vec<ValidationWarning>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SettlementRecord {
    pub fn id(&self) -> SettlementId {
        self.settlement.id()
    }
}

/// Persistence port for settlements
#[async_trait]
pub trait SettlementRepository: DomainPort {
    /// Stores a new record; fails with `Conflict` if the id exists
    async fn insert(&self, record: SettlementRecord) -> Result<(), PortError>;

    /// Loads a record by id
    async fn get(&self, id: SettlementId) -> Result<SettlementRecord, PortError>;

    /// Lists all records, oldest first
    async fn list(&self) -> Result<Vec<SettlementRecord>, PortError>;

    /// Replaces an existing record; fails with `NotFound` if absent
    async fn replace(&self, record: SettlementRecord) -> Result<(), PortError>;

    /// Removes and returns a record
    async fn remove(&self, id: SettlementId) -> Result<SettlementRecord, PortError>;
}
