//! Port error types shared by repository adapters
//!
//! Domain crates declare their repository traits on top of [`DomainPort`];
//! adapters report failures as a [`PortError`].

use std::fmt;
use thiserror::Error;

/// Failure reported by a port adapter
#[derive(Debug, Error)]
pub enum PortError {
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// An entity with the same identity already exists
    #[error("Conflict: {message}")]
    Conflict { message: String },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }
}

/// Marker trait for ports; adapters must be shareable across async handlers
pub trait DomainPort: Send + Sync + 'static {}
