//! Term identifier scheme: a fixed prefix followed by a zero-padded number
//!
//! The number of the term at data row `n` (1-based, header excluded) must be
//! exactly `n`. Row order is therefore authoritative: inserting, deleting or
//! duplicating a row without renumbering breaks the sequence.

use regex::Regex;

use crate::error::{Error, Result};

/// Why an identifier was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemeViolation {
    /// Does not match `PREFIX` + fixed-width digits
    Malformed,
    /// Well formed, but the number does not match the row position
    OutOfSequence { found: u64, expected: u64 },
}

#[derive(Debug, Clone)]
pub struct IdentifierScheme {
    prefix: String,
    width: usize,
    pattern: Regex,
}

impl IdentifierScheme {
    pub fn new(prefix: impl Into<String>, width: usize) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(Error::InvalidConfig(
                "identifier prefix cannot be empty".to_string(),
            ));
        }
        if width == 0 || width > 18 {
            return Err(Error::InvalidConfig(format!(
                "identifier width must be between 1 and 18, got {}",
                width
            )));
        }
        let pattern = Regex::new(&format!(
            "^{}(?P<number>[0-9]{{{}}})$",
            regex::escape(&prefix),
            width
        ))?;
        Ok(Self {
            prefix,
            width,
            pattern,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Numeric suffix of a well-formed identifier
    pub fn parse(&self, identifier: &str) -> Option<u64> {
        self.pattern
            .captures(identifier)
            .and_then(|caps| caps.name("number"))
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Render the identifier for a number
    pub fn format(&self, number: u64) -> String {
        format!("{}{:0width$}", self.prefix, number, width = self.width)
    }

    /// Check an identifier against the row position it appears at
    pub fn check(
        &self,
        identifier: &str,
        position: u64,
    ) -> std::result::Result<u64, SchemeViolation> {
        let found = self.parse(identifier).ok_or(SchemeViolation::Malformed)?;
        if found != position {
            return Err(SchemeViolation::OutOfSequence {
                found,
                expected: position,
            });
        }
        Ok(found)
    }

    /// Start a gap-free sequence check over a term table
    pub fn sequence(&self) -> Sequence<'_> {
        Sequence {
            scheme: self,
            position: 0,
        }
    }
}

/// Tracks the row position while scanning the term table.
///
/// Every data row consumes a position, including rejected ones, so one bad
/// row does not shift the expectation for the rows after it.
#[derive(Debug)]
pub struct Sequence<'a> {
    scheme: &'a IdentifierScheme,
    position: u64,
}

impl Sequence<'_> {
    pub fn advance(
        &mut self,
        identifier: &str,
    ) -> std::result::Result<u64, SchemeViolation> {
        self.position += 1;
        self.scheme.check(identifier, self.position)
    }

    /// Position of the last row passed to [`advance`](Self::advance)
    pub fn position(&self) -> u64 {
        self.position
    }
}
