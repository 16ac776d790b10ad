//! Error types
//!
//! Each layer has its own error enum. `From` conversions let `?` carry a
//! byte store failure up to the wire-level [`ErrorKind`].

use domos_hal::StoreError;
use domos_protocol::ErrorKind;

use crate::config::{ConfigError, ProvisionError};

/// Layout codec errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// Slot would end past the last store address
    StoreFull,
    /// Persisted bytes do not decode
    Corrupted,
    /// Byte store failure
    Store(StoreError),
}

impl From<StoreError> for LayoutError {
    fn from(e: StoreError) -> Self {
        LayoutError::Store(e)
    }
}

/// Registry operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// Every address is already assigned
    Full,
    /// Explicit number 0
    ZeroNotAllowed,
    /// Explicit number above capacity
    NumberOutOfRange,
    /// Explicit name already in use
    NameNotUnique,
    /// Explicit number already in use
    NumberNotUnique,
    /// Generated name retries exhausted
    NoFreeName,
    /// Generated number retries exhausted
    NoFreeNumber,
    /// No record with that name
    NotFound,
    /// Registry holds no records
    Empty,
    /// Records are configured on the alternate medium
    StorageUnavailable,
    Layout(LayoutError),
}

impl From<LayoutError> for RegistryError {
    fn from(e: LayoutError) -> Self {
        RegistryError::Layout(e)
    }
}

impl From<StoreError> for RegistryError {
    fn from(e: StoreError) -> Self {
        RegistryError::Layout(LayoutError::Store(e))
    }
}

impl From<RegistryError> for ErrorKind {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::Full => ErrorKind::PeripheralMaximumNumberReach,
            RegistryError::ZeroNotAllowed => ErrorKind::PeripheralZeroNotAllowed,
            RegistryError::NumberOutOfRange => ErrorKind::DecimalNumberTooBig,
            RegistryError::NameNotUnique => ErrorKind::PeripheralNameNotUnique,
            RegistryError::NumberNotUnique => ErrorKind::PeripheralNumberNotUnique,
            RegistryError::NoFreeName => ErrorKind::CantFindFreeName,
            RegistryError::NoFreeNumber => ErrorKind::CantFindFreeNumber,
            RegistryError::NotFound => ErrorKind::PeripheralNotFound,
            RegistryError::Empty => ErrorKind::ThereAreZeroPeripheral,
            RegistryError::StorageUnavailable => ErrorKind::StorageUnavailable,
            RegistryError::Layout(LayoutError::StoreFull) => ErrorKind::EepromIsFull,
            RegistryError::Layout(_) => ErrorKind::BadThingsHappen,
        }
    }
}

impl From<LayoutError> for ErrorKind {
    fn from(e: LayoutError) -> Self {
        RegistryError::Layout(e).into()
    }
}

/// Failures while bringing a module up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootError {
    Layout(LayoutError),
    /// Persisted configuration is out of range
    Config(ConfigError),
    /// Provisioning data rejected
    Provision(ProvisionError),
    /// Signal bus wired with a different number of address lines
    BusMismatch { expected: u8, actual: u8 },
}

impl From<LayoutError> for BootError {
    fn from(e: LayoutError) -> Self {
        BootError::Layout(e)
    }
}

impl From<StoreError> for BootError {
    fn from(e: StoreError) -> Self {
        BootError::Layout(LayoutError::Store(e))
    }
}

impl From<ConfigError> for BootError {
    fn from(e: ConfigError) -> Self {
        BootError::Config(e)
    }
}

impl From<ProvisionError> for BootError {
    fn from(e: ProvisionError) -> Self {
        BootError::Provision(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_full_is_eeprom_full() {
        let kind: ErrorKind = RegistryError::Layout(LayoutError::StoreFull).into();
        assert_eq!(kind, ErrorKind::EepromIsFull);
        assert_eq!(kind.code(), 10);
    }

    #[test]
    fn test_device_failures_are_internal() {
        let kind: ErrorKind = RegistryError::from(StoreError::Device).into();
        assert_eq!(kind, ErrorKind::BadThingsHappen);
        let kind: ErrorKind = LayoutError::Corrupted.into();
        assert_eq!(kind, ErrorKind::BadThingsHappen);
    }

    #[test]
    fn test_registry_codes() {
        assert_eq!(ErrorKind::from(RegistryError::Full).code(), 15);
        assert_eq!(ErrorKind::from(RegistryError::ZeroNotAllowed).code(), 14);
        assert_eq!(ErrorKind::from(RegistryError::NotFound).code(), 11);
        assert_eq!(ErrorKind::from(RegistryError::Empty).code(), 23);
        assert_eq!(ErrorKind::from(RegistryError::StorageUnavailable).code(), 25);
    }
}
