//! Whitespace tokenizer
//!
//! Splits a command line into tokens from left to right. Each token must
//! fit the token buffer; an oversized token is an error for the whole line,
//! it is never shortened.

use heapless::String;

use crate::errors::ParseError;

/// Token buffer capacity, including room for the terminator
pub const TOKEN_CAPACITY: usize = 16;

/// Longest accepted token
pub const MAX_TOKEN_LEN: usize = TOKEN_CAPACITY - 1;

/// Owned copy of a single token
pub type Token = String<MAX_TOKEN_LEN>;

/// Left-to-right token splitter
///
/// After the first error the tokenizer is exhausted.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    /// Start tokenizing `line`
    pub fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    /// Text not yet split off, with leading whitespace removed
    pub fn remainder(&self) -> &'a str {
        self.rest.trim_start_matches(|c: char| c.is_ascii_whitespace())
    }

    /// Split off the next token
    ///
    /// Returns `Ok(None)` once the line is exhausted.
    pub fn next_token(&mut self) -> Result<Option<&'a str>, ParseError> {
        let rest = self.remainder();
        if rest.is_empty() {
            self.rest = rest;
            return Ok(None);
        }

        let end = rest
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);

        if token.len() > MAX_TOKEN_LEN {
            self.rest = "";
            return Err(ParseError::TokenTooLong);
        }

        self.rest = tail;
        Ok(Some(token))
    }

    /// Split off the next token as an owned [`Token`]
    pub fn next_owned(&mut self) -> Result<Option<Token>, ParseError> {
        match self.next_token()? {
            // Length already bounded by next_token
            Some(token) => Token::try_from(token)
                .map(Some)
                .map_err(|_| ParseError::TokenTooLong),
            None => Ok(None),
        }
    }

    /// Fail if any token is left on the line
    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        match self.next_token()? {
            Some(_) => Err(ParseError::SubCommandNotRecognized),
            None => Ok(()),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<&'a str, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
