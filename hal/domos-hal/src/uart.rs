//! UART serial communication abstractions
//!
//! The registry is driven over a single serial command channel. Reception
//! is polled: the session loop must tolerate "nothing received yet".

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Write `text` followed by CR LF
    fn write_line(&mut self, text: &str) -> Result<(), Self::Error> {
        self.write_blocking(text.as_bytes())?;
        self.write_blocking(b"\r\n")
    }
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Take one received byte if any is waiting
    ///
    /// Returns `Ok(None)` immediately when the receive buffer is empty.
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error>;
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}
