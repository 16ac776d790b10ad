//! Lines sent back to the operator

use core::fmt::{self, Write};

use heapless::String;

use crate::errors::ErrorKind;

/// Longest rendered reply
pub const MAX_REPLY_LEN: usize = 96;

/// One rendered reply line, without the line terminator
pub type ReplyLine = String<MAX_REPLY_LEN>;

/// A reply to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply<'a> {
    /// Banner printed once the module is ready
    Welcome,
    /// A peripheral was registered
    Created { name: &'a str, number: u8 },
    /// One entry of a `list`
    Listed { name: &'a str, number: u8 },
    /// A peripheral was removed
    Deleted,
    /// Provisioning cleared, a power cycle is needed
    ResetComplete,
    /// Farewell on `exit`
    Goodbye,
    /// Failure of the previous command
    Error(ErrorKind),
}

impl Reply<'_> {
    /// Render into a fixed-capacity line
    pub fn render(&self) -> Result<ReplyLine, fmt::Error> {
        let mut line = ReplyLine::new();
        write!(line, "{}", self)?;
        Ok(line)
    }
}

impl fmt::Display for Reply<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Reply::Welcome => f.write_str("Welcome to DomoS"),
            Reply::Created { name, number } => write!(
                f,
                "Peripheral {} with number {} (addressing {:b}) created successfully!",
                name, number, number
            ),
            Reply::Listed { name, number } => write!(
                f,
                "Peripheral {} with number {} (addressing {:b})",
                name, number, number
            ),
            Reply::Deleted => f.write_str("Peripheral deleted successfully"),
            Reply::ResetComplete => f.write_str("Resetting complete, now reset your module"),
            Reply::Goodbye => f.write_str("Bye bye from me and my creator ;)"),
            Reply::Error(kind) => write!(f, "error {}: {}", kind.code(), kind.message()),
        }
    }
}
