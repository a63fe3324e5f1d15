//! Core Kernel - shared types for settlement apportionment
//!
//! - [`Money`], [`Currency`] and [`Rate`] with exact decimal arithmetic
//! - Typed identifiers
//! - Port errors for repository adapters

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError, Rate};
pub use identifiers::{SettlementId, LineItemId};
pub use ports::{PortError, DomainPort};
