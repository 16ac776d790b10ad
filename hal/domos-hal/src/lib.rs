//! DomoS Hardware Abstraction Layer
//!
//! This crate defines the hardware boundary of the peripheral registry.
//! Chip-specific crates implement these traits so the registry and the
//! command interpreter run unchanged on the controller and on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (domos-firmware, tests)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  domos-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  domos-hal-   │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`eeprom::ByteStore`] - Byte-addressable persistent storage
//! - [`sector::MirroredSector`] - `ByteStore` emulated on a NOR flash sector
//! - [`gpio::OutputPin`] - Digital address lines
//! - [`pwm::AnalogOutput`] - Analog/PWM signal line
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial command channel

#![no_std]
#![deny(unsafe_code)]

pub mod eeprom;
pub mod gpio;
pub mod pwm;
pub mod sector;
pub mod uart;

pub use eeprom::{ByteStore, StoreError};
pub use gpio::OutputPin;
pub use pwm::AnalogOutput;
pub use sector::MirroredSector;
pub use uart::{UartRx, UartTx};
