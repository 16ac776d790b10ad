//! Peripheral registry
//!
//! Records live in dense slots `0..peripheral_count`. Deleting a record
//! moves the last one into the freed slot, so indices are not stable across
//! deletions and listing order changes.
//!
//! Every mutation writes through to the byte store immediately: first the
//! record slot, then the peripheral count. A failed slot write therefore
//! never makes a partial record visible.

use core::fmt::Write;

use domos_hal::ByteStore;
use domos_protocol::PeripheralName;

use crate::config::{ModuleConfig, ProvisioningRequest};
use crate::error::{BootError, LayoutError, RegistryError};
use crate::layout::Layout;
use crate::record::PeripheralRecord;

/// Candidates tried for a generated name
pub const MAX_NAME_ATTEMPTS: u16 = 255;

/// How the registry was brought up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootKind {
    /// Blank store, provisioned from the request
    Provisioned,
    /// Existing configuration loaded
    Loaded,
}

/// Peripheral registry over a byte store
pub struct Registry<S> {
    layout: Layout<S>,
    /// Cached copy of the persisted configuration
    config: ModuleConfig,
}

impl<S: ByteStore> Registry<S> {
    /// Open the registry, provisioning the store first if it is blank
    pub fn open(
        store: S,
        request: &ProvisioningRequest<'_>,
    ) -> Result<(Self, BootKind), BootError> {
        let mut layout = Layout::new(store);

        if layout.is_provisioned()? {
            let config = layout.read_config()?;
            config.check()?;
            Ok((Self { layout, config }, BootKind::Loaded))
        } else {
            let config = provision(&mut layout, request)?;
            Ok((Self { layout, config }, BootKind::Provisioned))
        }
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout<S> {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut Layout<S> {
        &mut self.layout
    }

    pub fn into_layout(self) -> Layout<S> {
        self.layout
    }

    /// Number of live records
    pub fn count(&self) -> u8 {
        self.config.peripheral_count
    }

    /// Maximum number of records, `2^address_pin_count - 1`
    pub fn capacity(&self) -> u8 {
        self.config.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn is_full(&self) -> bool {
        self.count() >= self.capacity()
    }

    /// Record at `index`
    pub fn record(&mut self, index: u8) -> Result<PeripheralRecord, RegistryError> {
        if index >= self.count() {
            return Err(RegistryError::NotFound);
        }
        Ok(self.layout.read_record(index as usize)?)
    }

    /// Index of the first record named `name`
    pub fn find_by_name(&mut self, name: &str) -> Result<Option<u8>, RegistryError> {
        for index in 0..self.count() {
            if self.layout.read_record(index as usize)?.name == name {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Index of the first record with `number`
    pub fn find_by_number(&mut self, number: u8) -> Result<Option<u8>, RegistryError> {
        for index in 0..self.count() {
            if self.layout.read_record(index as usize)?.number == number {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Register a new peripheral
    ///
    /// Explicit values must already be free. Omitted values are generated:
    /// the number starts at `count + 1`, the name at the decimal text of
    /// that starting number, and each is advanced until it is free.
    pub fn create(
        &mut self,
        name: Option<PeripheralName>,
        number: Option<u8>,
    ) -> Result<PeripheralRecord, RegistryError> {
        let count = self.count();
        let capacity = self.capacity();
        if count >= capacity {
            return Err(RegistryError::Full);
        }

        match number {
            Some(0) => return Err(RegistryError::ZeroNotAllowed),
            Some(n) if n > capacity => return Err(RegistryError::NumberOutOfRange),
            _ => {}
        }

        // count < capacity <= 255, so this cannot overflow
        let provisional = number.unwrap_or(count + 1);

        if let Some(name) = &name {
            if self.find_by_name(name)?.is_some() {
                return Err(RegistryError::NameNotUnique);
            }
        }
        if number.is_some() && self.find_by_number(provisional)?.is_some() {
            return Err(RegistryError::NumberNotUnique);
        }

        let name = match name {
            Some(name) => name,
            None => self.free_default_name(provisional)?,
        };
        let number = match number {
            Some(number) => number,
            None => self.free_default_number(provisional)?,
        };

        if !self.config.storage.is_byte_store() {
            return Err(RegistryError::StorageUnavailable);
        }

        let record = PeripheralRecord { name, number };
        self.layout.write_record(count as usize, &record)?;
        self.set_count(count + 1)?;
        Ok(record)
    }

    /// Remove the peripheral named `name`
    ///
    /// Returns the removed record.
    pub fn delete(&mut self, name: &str) -> Result<PeripheralRecord, RegistryError> {
        let index = self.find_by_name(name)?.ok_or(RegistryError::NotFound)?;
        if !self.config.storage.is_byte_store() {
            return Err(RegistryError::StorageUnavailable);
        }

        let removed = self.layout.read_record(index as usize)?;
        let last = self.count() - 1;
        if index < last {
            let moved = self.layout.read_record(last as usize)?;
            self.layout.write_record(index as usize, &moved)?;
        }
        self.set_count(last)?;
        Ok(removed)
    }

    /// Iterate live records in slot order
    pub fn list(&mut self) -> Result<Records<'_, S>, RegistryError> {
        if self.is_empty() {
            return Err(RegistryError::Empty);
        }
        let count = self.count();
        Ok(Records {
            layout: &mut self.layout,
            next: 0,
            count,
        })
    }

    fn set_count(&mut self, count: u8) -> Result<(), LayoutError> {
        self.layout.write_peripheral_count(count)?;
        self.config.peripheral_count = count;
        Ok(())
    }

    fn free_default_name(&mut self, seed: u8) -> Result<PeripheralName, RegistryError> {
        let mut candidate = seed as u16;
        for _ in 0..MAX_NAME_ATTEMPTS {
            let mut name = PeripheralName::new();
            // At most three digits
            write!(name, "{}", candidate).map_err(|_| RegistryError::NoFreeName)?;
            if self.find_by_name(&name)?.is_none() {
                return Ok(name);
            }
            candidate += 1;
        }
        Err(RegistryError::NoFreeName)
    }

    fn free_default_number(&mut self, seed: u8) -> Result<u8, RegistryError> {
        let capacity = self.capacity();
        let mut candidate = seed;
        for _ in 0..capacity {
            if self.find_by_number(candidate)?.is_none() {
                return Ok(candidate);
            }
            // Wrap within 1..=capacity, 0 is reserved
            candidate = if candidate >= capacity { 1 } else { candidate + 1 };
        }
        Err(RegistryError::NoFreeNumber)
    }
}

/// Write a fresh configuration to a blank store
///
/// The store is cleared first and the sentinel is written last, so an
/// interrupted provisioning is retried on the next boot.
pub fn provision<S: ByteStore>(
    layout: &mut Layout<S>,
    request: &ProvisioningRequest<'_>,
) -> Result<ModuleConfig, BootError> {
    let config = request.validate()?;
    layout.clear_all()?;
    layout.write_config(&config)?;
    layout.mark_provisioned()?;
    Ok(config)
}

/// Live records, read one slot at a time
pub struct Records<'a, S> {
    layout: &'a mut Layout<S>,
    next: u8,
    count: u8,
}

impl<S: ByteStore> Iterator for Records<'_, S> {
    type Item = Result<PeripheralRecord, RegistryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(
            self.layout
                .read_record(index as usize)
                .map_err(RegistryError::from),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.next) as usize;
        (remaining, Some(remaining))
    }
}
