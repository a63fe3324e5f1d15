//! Request and response bodies

pub mod settlements;
