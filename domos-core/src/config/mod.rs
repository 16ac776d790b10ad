//! Configuration types
//!
//! The module configuration persisted at the start of the byte store, and
//! the provisioning request it is created from.

pub mod provision;
pub mod types;

pub use provision::*;
pub use types::*;
