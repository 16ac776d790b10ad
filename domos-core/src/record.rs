//! Peripheral record

use domos_protocol::{PeripheralName, NAME_FIELD_LEN};

use crate::error::LayoutError;

/// Persisted slot width: name field plus number byte
pub const RECORD_LEN: usize = NAME_FIELD_LEN + 1;

/// One registered peripheral
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeripheralRecord {
    pub name: PeripheralName,
    /// Bus address, never 0
    pub number: u8,
}

impl PeripheralRecord {
    /// Slot bytes: NUL-padded name, then the number
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut bytes = [0u8; RECORD_LEN];
        bytes[..self.name.len()].copy_from_slice(self.name.as_bytes());
        bytes[NAME_FIELD_LEN] = self.number;
        bytes
    }

    /// Decode slot bytes
    ///
    /// The name ends at the first NUL, which must appear within the field.
    pub fn from_bytes(bytes: &[u8; RECORD_LEN]) -> Result<Self, LayoutError> {
        let field = &bytes[..NAME_FIELD_LEN];
        let end = field
            .iter()
            .position(|&b| b == 0)
            .ok_or(LayoutError::Corrupted)?;
        let text = core::str::from_utf8(&field[..end]).map_err(|_| LayoutError::Corrupted)?;
        if !text.is_ascii() {
            return Err(LayoutError::Corrupted);
        }
        let name = PeripheralName::try_from(text).map_err(|_| LayoutError::Corrupted)?;

        Ok(Self {
            name,
            number: bytes[NAME_FIELD_LEN],
        })
    }
}
