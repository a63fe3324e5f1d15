//! Settlement domain errors

use core_kernel::{MoneyError, PortError};
use thiserror::Error;

/// Errors that can occur in the settlement domain
///
/// The calculation itself never fails; every variant here comes from the
/// validation phase or from the repository behind the service.
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("invalid settlement structure: missing required field `{0}`")]
    MissingField(String),

    #[error("invalid settlement structure: {0}")]
    InvalidStructure(String),

    #[error("invalid settlement structure: {0}")]
    OutOfRange(String),

    #[error("invalid settlement structure: {0}")]
    Money(#[from] MoneyError),

    #[error("Settlement not found: {0}")]
    NotFound(String),

    #[error("Settlement conflict: {0}")]
    Conflict(String),
}

impl SettlementError {
    /// Returns true if the caller supplied a structurally invalid settlement
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            SettlementError::MissingField(_)
                | SettlementError::InvalidStructure(_)
                | SettlementError::OutOfRange(_)
                | SettlementError::Money(_)
        )
    }
}

impl From<PortError> for SettlementError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { id, .. } => SettlementError::NotFound(id),
            PortError::Conflict { message } => SettlementError::Conflict(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_conflict_maps_to_conflict() {
        let err: SettlementError = PortError::conflict("Settlement STL-1 already exists").into();
        assert!(matches!(err, SettlementError::Conflict(_)));
        assert!(!err.is_malformed_input());
    }

    #[test]
    fn test_port_not_found_keeps_id() {
        let err: SettlementError = PortError::not_found("Settlement", "STL-1").into();
        assert!(matches!(err, SettlementError::NotFound(ref id) if id == "STL-1"));
    }
}
