//! Module start-up
//!
//! Opens the registry (provisioning a blank store from module.toml), then
//! claims the address lines named by the stored configuration.

use defmt::*;
use embassy_time::Delay;

use domos_core::{
    AddressLines, BootError, BootKind, ProvisioningRequest, Registry, RegistrySession, SignalBus,
};
use domos_hal_rp2040::{AddressLine, FlashEeprom, PinBank, PinError, PwmLevelOutput};

use crate::module_config::{ADDRESS_PINS, OUTPUT_PIN, STORAGE_CHIP_SELECT};

/// The session as wired on the board
pub type FirmwareSession =
    RegistrySession<FlashEeprom<'static>, AddressLine, PwmLevelOutput<'static>, Delay>;

/// Start-up failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum StartupError {
    Boot(BootError),
    Pin(PinError),
}

impl From<BootError> for StartupError {
    fn from(e: BootError) -> Self {
        StartupError::Boot(e)
    }
}

impl From<PinError> for StartupError {
    fn from(e: PinError) -> Self {
        StartupError::Pin(e)
    }
}

/// Open the registry and build the session
pub fn start(
    store: FlashEeprom<'static>,
    bank: &mut PinBank,
    output: PwmLevelOutput<'static>,
) -> Result<FirmwareSession, StartupError> {
    let request = ProvisioningRequest {
        address_pins: ADDRESS_PINS,
        output_pin: OUTPUT_PIN,
        storage_chip_select: STORAGE_CHIP_SELECT,
    };

    let (registry, kind) = Registry::open(store, &request)?;
    match kind {
        BootKind::Provisioned => info!("Blank store, provisioned from module.toml"),
        BootKind::Loaded => info!("Stored configuration loaded"),
    }

    let config = registry.config();
    info!(
        "Registry: {} address lines, {}/{} peripherals",
        config.address_pin_count,
        registry.count(),
        registry.capacity()
    );
    if config.output_pin != OUTPUT_PIN {
        warn!(
            "Stored output pin GPIO{} ignored, driving GPIO{}",
            config.output_pin, OUTPUT_PIN
        );
    }
    if !config.storage.is_byte_store() {
        warn!("Card storage selected: registry changes will be rejected");
    }

    let mut lines = AddressLines::new();
    for &pin in config.address_pins() {
        let line = AddressLine::new(bank.take(pin)?);
        // A surplus line is caught by the session's line count check
        let _ = lines.push(line);
    }
    debug!("{} address lines claimed", lines.len());

    let bus = SignalBus::new(lines, output);
    Ok(RegistrySession::new(registry, bus, Delay)?)
}
