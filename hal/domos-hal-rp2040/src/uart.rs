//! Buffered UART console
//!
//! The interrupt-driven buffered UART fills its ring buffer in the
//! background; the session polls it one byte at a time and never waits.

use domos_hal::{UartRx, UartTx};
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx, Error};
use embedded_io::{Read, ReadReady, Write};

/// Console receiver
pub struct ConsoleRx {
    rx: BufferedUartRx,
}

impl ConsoleRx {
    pub fn new(rx: BufferedUartRx) -> Self {
        Self { rx }
    }
}

impl UartRx for ConsoleRx {
    type Error = Error;

    fn try_read_byte(&mut self) -> Result<Option<u8>, Error> {
        if !self.rx.read_ready()? {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.rx.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

/// Console transmitter
pub struct ConsoleTx {
    tx: BufferedUartTx,
}

impl ConsoleTx {
    pub fn new(tx: BufferedUartTx) -> Self {
        Self { tx }
    }
}

impl UartTx for ConsoleTx {
    type Error = Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Error> {
        self.tx.write_all(data)
    }
}
