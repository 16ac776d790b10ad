//! Board-agnostic peripheral registry for DomoS modules
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Module configuration and provisioning validation
//! - Persistent layout codec over a [`ByteStore`](domos_hal::ByteStore)
//! - Peripheral registry with uniqueness rules and auto-assignment
//! - Address encoder for the bus select lines
//! - Signal bus activation sequence
//! - The [`RegistrySession`] that ties them to the serial command channel

#![no_std]
#![deny(unsafe_code)]

pub mod address;
pub mod bus;
pub mod config;
pub mod error;
pub mod layout;
pub mod record;
pub mod registry;
pub mod session;

#[cfg(test)]
mod mock;

pub use address::{encode, AddressBits, AddressError};
pub use bus::{AddressLines, SignalBus, ADDRESS_PROPAGATION_MS, OUTPUT_SETTLE_MS};
pub use config::{ModuleConfig, ProvisionError, ProvisioningRequest, StorageSelector};
pub use error::{BootError, LayoutError, RegistryError};
pub use layout::Layout;
pub use record::PeripheralRecord;
pub use registry::{BootKind, Registry};
pub use session::{Activity, LinkError, RegistrySession};
