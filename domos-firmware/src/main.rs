//! DomoS - Peripheral Registry Firmware
//!
//! Firmware binary for RP2040-based DomoS modules. A module drives a small
//! bus of address lines plus one analog activation output, and keeps a
//! registry of named peripherals in flash. It is operated line by line over
//! the UART console.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use domos_hal_rp2040::{flash_eeprom, pin_bank, ConsoleRx, ConsoleTx, PwmLevelOutput};

mod boot;
mod tasks;

/// Provisioning constants generated from module.toml
mod module_config {
    include!(concat!(env!("OUT_DIR"), "/module_config.rs"));
}

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 128]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("DomoS firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Console UART on GPIO0/GPIO1
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 128]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for the command console");

    // Activation output: GPIO6 is PWM slice 3, channel A
    let pwm = Pwm::new_output_a(p.PWM_SLICE3, p.PIN_6, PwmConfig::default());
    let output = PwmLevelOutput::new(pwm);

    // Every GPIO not used above can become an address line
    let mut bank = pin_bank!(p;
        2 => PIN_2, 3 => PIN_3, 4 => PIN_4, 5 => PIN_5,
        7 => PIN_7, 8 => PIN_8, 9 => PIN_9, 10 => PIN_10,
        11 => PIN_11, 12 => PIN_12, 13 => PIN_13, 14 => PIN_14,
        15 => PIN_15, 16 => PIN_16, 17 => PIN_17, 18 => PIN_18,
        19 => PIN_19, 20 => PIN_20, 21 => PIN_21, 22 => PIN_22,
        23 => PIN_23, 24 => PIN_24, 25 => PIN_25, 26 => PIN_26,
        27 => PIN_27, 28 => PIN_28, 29 => PIN_29,
    );

    let store = match flash_eeprom(p.FLASH) {
        Ok(store) => store,
        Err(e) => {
            error!("Flash store unavailable: {:?}", e);
            park().await
        }
    };

    let session = match boot::start(store, &mut bank, output) {
        Ok(session) => session,
        Err(e) => {
            error!("Boot failed: {:?}", e);
            park().await
        }
    };

    spawner
        .spawn(tasks::session_task(
            session,
            ConsoleRx::new(rx),
            ConsoleTx::new(tx),
        ))
        .unwrap();

    info!("Session task spawned, firmware running");

    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Stop doing anything; the operator has to power-cycle the module
async fn park() -> ! {
    loop {
        Timer::after_secs(60).await;
    }
}
