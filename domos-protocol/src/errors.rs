//! Error taxonomy reported over the command channel
//!
//! Every failure that reaches the operator is one of the [`ErrorKind`]s
//! below. The numeric codes are part of the protocol: they are printed in
//! front of the message and must not be renumbered.

use crate::line::LineError;

/// Wire-level error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorKind {
    /// Command line exceeds the line buffer
    CommandStringTooLong = 1,
    /// A single token exceeds the token buffer
    SubCommandStringTooLong = 2,
    /// First token is not a command
    CommandNotRecognized = 3,
    /// Line holds no tokens at all
    NoCommandParameters = 4,
    /// Argument token is not part of the command's grammar
    SubCommandNotRecognized = 5,
    /// Peripheral name missing where one is required
    NameNotDefined = 6,
    /// Peripheral name longer than the name field
    NameTooLong = 7,
    /// `as` given without an address
    AsNotDefined = 8,
    /// Binary address has more bits than there are address lines
    BinaryNumberTooLong = 9,
    /// Byte store cannot hold another record
    EepromIsFull = 10,
    /// No peripheral with that name
    PeripheralNotFound = 11,
    /// Drive level token not recognized
    StrangeTurnParameter = 12,
    /// Internal invariant violated
    BadThingsHappen = 13,
    /// Address 0 is reserved
    PeripheralZeroNotAllowed = 14,
    /// Registry already holds the maximum number of peripherals
    PeripheralMaximumNumberReach = 15,
    /// Explicit name already in use
    PeripheralNameNotUnique = 16,
    /// Explicit number already in use
    PeripheralNumberNotUnique = 17,
    /// No free generated name found
    CantFindFreeName = 18,
    /// No free generated number found
    CantFindFreeNumber = 19,
    /// Voltage below 0 V
    VoltageTooLow = 20,
    /// Voltage above 5 V
    VoltageTooHigh = 21,
    /// Decimal address above the registry capacity
    DecimalNumberTooBig = 22,
    /// Nothing to list
    ThereAreZeroPeripheral = 23,
    /// Address token is neither decimal nor `b` followed by binary digits
    AddressMalformed = 24,
    /// Alternate storage medium selected, which is not available
    StorageUnavailable = 25,
    /// Percentage outside 0..=100
    PercentOutOfRange = 26,
}

impl ErrorKind {
    /// Every kind, in code order
    pub const ALL: [ErrorKind; 26] = [
        ErrorKind::CommandStringTooLong,
        ErrorKind::SubCommandStringTooLong,
        ErrorKind::CommandNotRecognized,
        ErrorKind::NoCommandParameters,
        ErrorKind::SubCommandNotRecognized,
        ErrorKind::NameNotDefined,
        ErrorKind::NameTooLong,
        ErrorKind::AsNotDefined,
        ErrorKind::BinaryNumberTooLong,
        ErrorKind::EepromIsFull,
        ErrorKind::PeripheralNotFound,
        ErrorKind::StrangeTurnParameter,
        ErrorKind::BadThingsHappen,
        ErrorKind::PeripheralZeroNotAllowed,
        ErrorKind::PeripheralMaximumNumberReach,
        ErrorKind::PeripheralNameNotUnique,
        ErrorKind::PeripheralNumberNotUnique,
        ErrorKind::CantFindFreeName,
        ErrorKind::CantFindFreeNumber,
        ErrorKind::VoltageTooLow,
        ErrorKind::VoltageTooHigh,
        ErrorKind::DecimalNumberTooBig,
        ErrorKind::ThereAreZeroPeripheral,
        ErrorKind::AddressMalformed,
        ErrorKind::StorageUnavailable,
        ErrorKind::PercentOutOfRange,
    ];

    /// Numeric code sent over the wire
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable description
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::CommandStringTooLong => "The command line exceeds 63 characters.",
            ErrorKind::SubCommandStringTooLong => "One of the words in the command is too long.",
            ErrorKind::CommandNotRecognized => "The command was not recognized.",
            ErrorKind::NoCommandParameters => "There is no command in the line.",
            ErrorKind::SubCommandNotRecognized => "One of the command arguments was not recognized.",
            ErrorKind::NameNotDefined => "The name of the peripheral was not given.",
            ErrorKind::NameTooLong => "The name is longer than 9 characters.",
            ErrorKind::AsNotDefined => "The address was not given.",
            ErrorKind::BinaryNumberTooLong => "The binary address has too many digits.",
            ErrorKind::EepromIsFull => "The storage is full.",
            ErrorKind::PeripheralNotFound => "The peripheral was not found.",
            ErrorKind::StrangeTurnParameter => "The turn level was not recognized.",
            ErrorKind::BadThingsHappen => "Internal error.",
            ErrorKind::PeripheralZeroNotAllowed => "Peripheral number zero is reserved.",
            ErrorKind::PeripheralMaximumNumberReach => "The maximum number of peripherals was reached.",
            ErrorKind::PeripheralNameNotUnique => "The name is already in use.",
            ErrorKind::PeripheralNumberNotUnique => "The number is already in use.",
            ErrorKind::CantFindFreeName => "Cannot find a free default name.",
            ErrorKind::CantFindFreeNumber => "Cannot find a free address.",
            ErrorKind::VoltageTooLow => "The voltage is below 0 V.",
            ErrorKind::VoltageTooHigh => "The voltage is above 5 V.",
            ErrorKind::DecimalNumberTooBig => "The address is too big for the address lines.",
            ErrorKind::ThereAreZeroPeripheral => "There are no peripherals to show.",
            ErrorKind::AddressMalformed => "The address is not a number.",
            ErrorKind::StorageUnavailable => "The selected storage medium is not available.",
            ErrorKind::PercentOutOfRange => "The percentage must be between 0 and 100.",
        }
    }
}

/// Errors raised while reading and parsing a command line
///
/// Every parse error aborts the whole line; nothing from the line is
/// executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line longer than the line buffer
    LineTooLong,
    /// Line holds a byte outside printable ASCII
    InvalidCharacter,
    /// Token longer than the token buffer
    TokenTooLong,
    /// Line holds only whitespace
    NoCommand,
    /// Unknown command keyword
    CommandNotRecognized,
    /// Unknown or surplus argument
    SubCommandNotRecognized,
    /// Required name missing
    NameNotDefined,
    /// Name longer than the name field
    NameTooLong,
    /// `as` without an address
    AsNotDefined,
    /// Binary address wider than the address lines
    BinaryNumberTooLong,
    /// Decimal address above capacity
    DecimalNumberTooBig,
    /// Address with a non-digit character
    AddressMalformed,
    /// Unknown drive level
    StrangeTurnParameter,
    /// Voltage below range
    VoltageTooLow,
    /// Voltage above range
    VoltageTooHigh,
    /// Percentage outside range
    PercentOutOfRange,
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::LineTooLong => ErrorKind::CommandStringTooLong,
            ParseError::InvalidCharacter => ErrorKind::CommandNotRecognized,
            ParseError::TokenTooLong => ErrorKind::SubCommandStringTooLong,
            ParseError::NoCommand => ErrorKind::NoCommandParameters,
            ParseError::CommandNotRecognized => ErrorKind::CommandNotRecognized,
            ParseError::SubCommandNotRecognized => ErrorKind::SubCommandNotRecognized,
            ParseError::NameNotDefined => ErrorKind::NameNotDefined,
            ParseError::NameTooLong => ErrorKind::NameTooLong,
            ParseError::AsNotDefined => ErrorKind::AsNotDefined,
            ParseError::BinaryNumberTooLong => ErrorKind::BinaryNumberTooLong,
            ParseError::DecimalNumberTooBig => ErrorKind::DecimalNumberTooBig,
            ParseError::AddressMalformed => ErrorKind::AddressMalformed,
            ParseError::StrangeTurnParameter => ErrorKind::StrangeTurnParameter,
            ParseError::VoltageTooLow => ErrorKind::VoltageTooLow,
            ParseError::VoltageTooHigh => ErrorKind::VoltageTooHigh,
            ParseError::PercentOutOfRange => ErrorKind::PercentOutOfRange,
        }
    }
}

impl From<LineError> for ParseError {
    fn from(e: LineError) -> Self {
        match e {
            LineError::TooLong => ParseError::LineTooLong,
            LineError::InvalidCharacter => ParseError::InvalidCharacter,
        }
    }
}

impl From<LineError> for ErrorKind {
    fn from(e: LineError) -> Self {
        ParseError::from(e).into()
    }
}
