//! In-memory settlement repository
//!
//! Backs the API when no external system of record is configured. Records
//! live for the lifetime of the process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use core_kernel::{DomainPort, PortError, SettlementId};
use domain_settlement::{SettlementRecord, SettlementRepository};

const ENTITY: &str = "Settlement";

/// Settlement repository held in process memory
#[derive(Debug, Default)]
pub struct InMemorySettlementRepository {
    records: RwLock<HashMap<SettlementId, SettlementRecord>>,
}

impl InMemorySettlementRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for InMemorySettlementRepository {}

#[async_trait]
impl SettlementRepository for InMemorySettlementRepository {
    async fn insert(&self, record: SettlementRecord) -> Result<(), PortError> {
        let mut records = self.records.write().await;
        let id = record.id();
        if records.contains_key(&id) {
            return Err(PortError::conflict(format!("{ENTITY} {id} already exists")));
        }
        records.insert(id, record);
        Ok(())
    }

    async fn get(&self, id: SettlementId) -> Result<SettlementRecord, PortError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found(ENTITY, id))
    }

    async fn list(&self) -> Result<Vec<SettlementRecord>, PortError> {
        let mut records: Vec<SettlementRecord> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id().as_uuid().cmp(b.id().as_uuid()))
        });
        Ok(records)
    }

    async fn replace(&self, record: SettlementRecord) -> Result<(), PortError> {
        let mut records = self.records.write().await;
        let id = record.id();
        match records.get_mut(&id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(PortError::not_found(ENTITY, id)),
        }
    }

    async fn remove(&self, id: SettlementId) -> Result<SettlementRecord, PortError> {
        self.records
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| PortError::not_found(ENTITY, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};
    use chrono::Utc;
    use domain_settlement::{calculate, SettlementError};
    use test_utils::SettlementDraftBuilder;

    use crate::error::ApiError;

    fn record() -> SettlementRecord {
        let settlement = SettlementDraftBuilder::new().settle();
        let breakdown = calculate(&settlement);
        let now = Utc::now();
        SettlementRecord {
            settlement,
            breakdown,
            warnings: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_a_conflict() {
        let repository = InMemorySettlementRepository::new();
        let record = record();
        repository.insert(record.clone()).await.unwrap();

        let err = repository.insert(record).await.unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));

        let api_error = ApiError::from(SettlementError::from(err));
        assert_eq!(api_error.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_replace_unknown_record_is_not_found() {
        let repository = InMemorySettlementRepository::new();
        let err = repository.replace(record()).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound { .. }));
    }
}
