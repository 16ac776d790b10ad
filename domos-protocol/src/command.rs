//! Command grammar
//!
//! One line holds exactly one command. The line is folded to lower case
//! before it is split, so keywords and names are case-insensitive.

use heapless::String;

use crate::address::parse_address;
use crate::errors::ParseError;
use crate::line::{Line, MAX_LINE_LEN};
use crate::tokenizer::{Token, Tokenizer};

/// Persisted name field width, including the terminator
pub const NAME_FIELD_LEN: usize = 10;

/// Longest peripheral name
pub const MAX_NAME_LEN: usize = NAME_FIELD_LEN - 1;

/// Peripheral name
pub type PeripheralName = String<MAX_NAME_LEN>;

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Register a new peripheral; omitted fields are generated
    Create {
        name: Option<PeripheralName>,
        number: Option<u8>,
    },
    /// Pulse a peripheral with a drive level
    ///
    /// The level token is kept raw so the peripheral lookup can fail first.
    Turn { name: PeripheralName, level: Token },
    /// Remove a peripheral
    Delete { name: PeripheralName },
    /// Show every peripheral
    List,
    /// Forget the provisioning on next boot
    Reset,
    /// Stop the session
    Exit,
}

impl Command {
    /// Parse one command line
    ///
    /// `address_pin_count` bounds the addresses accepted by `create ... as`.
    pub fn parse(line: &str, address_pin_count: u8) -> Result<Self, ParseError> {
        if line.len() > MAX_LINE_LEN {
            return Err(ParseError::LineTooLong);
        }
        if !line.is_ascii() {
            return Err(ParseError::InvalidCharacter);
        }

        let mut folded = Line::new();
        for c in line.chars() {
            // Cannot fail: length checked above
            let _ = folded.push(c.to_ascii_lowercase());
        }

        let mut tokens = Tokenizer::new(&folded);
        let keyword = tokens.next_token()?.ok_or(ParseError::NoCommand)?;

        match keyword {
            "create" => parse_create(&mut tokens, address_pin_count),
            "turn" => {
                let name = required_name(&mut tokens)?;
                let level = tokens
                    .next_owned()?
                    .ok_or(ParseError::StrangeTurnParameter)?;
                tokens.expect_end()?;
                Ok(Command::Turn { name, level })
            }
            "delete" => {
                let name = required_name(&mut tokens)?;
                tokens.expect_end()?;
                Ok(Command::Delete { name })
            }
            "list" => {
                tokens.expect_end()?;
                Ok(Command::List)
            }
            "reset" => {
                tokens.expect_end()?;
                Ok(Command::Reset)
            }
            "exit" => {
                tokens.expect_end()?;
                Ok(Command::Exit)
            }
            _ => Err(ParseError::CommandNotRecognized),
        }
    }
}

/// Validate a name token against the name field width
pub fn parse_name(token: &str) -> Result<PeripheralName, ParseError> {
    PeripheralName::try_from(token).map_err(|_| ParseError::NameTooLong)
}

fn required_name(tokens: &mut Tokenizer<'_>) -> Result<PeripheralName, ParseError> {
    let token = tokens.next_token()?.ok_or(ParseError::NameNotDefined)?;
    parse_name(token)
}

/// `create [name <text>] [as <address>]`, arguments in any order
///
/// A repeated argument replaces the earlier value.
fn parse_create(tokens: &mut Tokenizer<'_>, pin_count: u8) -> Result<Command, ParseError> {
    let mut name = None;
    let mut number = None;

    while let Some(argument) = tokens.next_token()? {
        match argument {
            "name" => {
                let token = tokens.next_token()?.ok_or(ParseError::NameNotDefined)?;
                name = Some(parse_name(token)?);
            }
            "as" => {
                let token = tokens.next_token()?.ok_or(ParseError::AsNotDefined)?;
                number = Some(parse_address(token, pin_count)?);
            }
            _ => return Err(ParseError::SubCommandNotRecognized),
        }
    }

    Ok(Command::Create { name, number })
}
