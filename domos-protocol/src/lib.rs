//! DomoS serial command protocol
//!
//! This crate defines the line-oriented text protocol spoken over the
//! single serial channel of a DomoS module. The controller reads one line,
//! folds it to lower case, splits it into tokens and matches them against
//! a small command grammar:
//!
//! ```text
//! create [name <text>] [as <decimal> | as b<binary>]
//! turn <name> <h|l|v<0..5>|%<0..100>>
//! delete <name>
//! list
//! reset
//! exit
//! ```
//!
//! Errors are reported back as numbered [`ErrorKind`]s; successful
//! commands answer with a [`Reply`] line.

#![no_std]
#![deny(unsafe_code)]

pub mod address;
pub mod command;
pub mod errors;
pub mod level;
pub mod line;
pub mod reply;
pub mod tokenizer;

pub use address::{decode_binary, max_address, parse_address, MAX_ADDRESS_PINS};
pub use command::{parse_name, Command, PeripheralName, MAX_NAME_LEN, NAME_FIELD_LEN};
pub use errors::{ErrorKind, ParseError};
pub use level::DriveLevel;
pub use line::{Line, LineBuffer, LineError, LINE_CAPACITY, MAX_LINE_LEN};
pub use reply::{Reply, ReplyLine, MAX_REPLY_LEN};
pub use tokenizer::{Token, Tokenizer, MAX_TOKEN_LEN, TOKEN_CAPACITY};
