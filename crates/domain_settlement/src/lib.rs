//! Settlement Apportionment Domain
//!
//! This crate turns a personal-injury settlement (gross amount, expenses,
//! attorney fee, and creditor line items) into an itemized breakdown of
//! reductions and the client's net proceeds.
//!
//! # Flow
//!
//! ```text
//! SettlementDraft -> validate -> Settlement -> calculate -> SettlementBreakdown
//! ```
//!
//! Validation is the only fallible step. [`engine::calculate`] is a pure
//! function; the authoritative save path and the live preview both call it.

pub mod settlement;
pub mod draft;
pub mod validation;
pub mod reduction;
pub mod breakdown;
pub mod engine;
pub mod ports;
pub mod service;
pub mod error;

pub use settlement::{
    Settlement, LineItem, Lien, LienType, ReductionMethod, ReductionPolicy,
    CategoryDefaults, CreditorCategory, AttorneyFee,
};
pub use draft::{SettlementDraft, LineItemDraft, LienDraft, AttorneyFeeDraft, AttorneyFeeBasis};
pub use validation::{
    validate, ValidationMode, ValidationWarning, ValidatedSettlement, MAX_AMOUNT, MAX_PERCENTAGE_POINTS,
};
pub use reduction::{ReductionPool, reduction_for, POOL_DIVISOR};
pub use breakdown::{ReductionResult, CategoryBreakdown, SettlementBreakdown};
pub use engine::calculate;
pub use ports::{SettlementRepository, SettlementRecord};
pub use service::{SettlementService, Assessment};
pub use error::SettlementError;
