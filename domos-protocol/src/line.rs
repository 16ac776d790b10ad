//! Line assembly for the serial command channel
//!
//! Bytes arrive one at a time. A line ends at `\n` or `\r`; empty lines
//! (the second half of a CR LF pair) are skipped. A line that outgrows the
//! buffer is not truncated: the rest of it is discarded and the whole line
//! is reported as too long once its terminator arrives.

use heapless::String;

/// Line buffer capacity, including room for the terminator
pub const LINE_CAPACITY: usize = 64;

/// Longest accepted line
pub const MAX_LINE_LEN: usize = LINE_CAPACITY - 1;

/// One received command line
pub type Line = String<LINE_CAPACITY>;

/// Errors reported when a line is terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// More than [`MAX_LINE_LEN`] characters before the terminator
    TooLong,
    /// A non-ASCII byte was received
    InvalidCharacter,
}

/// Incremental line assembler
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    line: Line,
    overflowed: bool,
    invalid: bool,
}

impl LineBuffer {
    /// Create an empty line buffer
    pub fn new() -> Self {
        Self {
            line: Line::new(),
            overflowed: false,
            invalid: false,
        }
    }

    /// Discard any partially received line
    pub fn reset(&mut self) {
        self.line.clear();
        self.overflowed = false;
        self.invalid = false;
    }

    /// Number of characters buffered so far
    pub fn len(&self) -> usize {
        self.line.len()
    }

    /// Check if nothing has been buffered
    pub fn is_empty(&self) -> bool {
        self.line.is_empty() && !self.overflowed && !self.invalid
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a line,
    /// `Ok(None)` when more bytes are needed, or `Err` when the completed
    /// line had to be rejected.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        match byte {
            b'\n' | b'\r' => self.finish(),
            _ => {
                if !byte.is_ascii() {
                    self.invalid = true;
                } else if self.line.len() >= MAX_LINE_LEN {
                    self.overflowed = true;
                } else {
                    // Cannot fail: length checked above
                    let _ = self.line.push(byte as char);
                }
                Ok(None)
            }
        }
    }

    fn finish(&mut self) -> Result<Option<Line>, LineError> {
        let result = if self.overflowed {
            Err(LineError::TooLong)
        } else if self.invalid {
            Err(LineError::InvalidCharacter)
        } else if self.line.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.line.clone()))
        };
        self.reset();
        result
    }
}
