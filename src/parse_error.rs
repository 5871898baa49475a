use std::error::Error;
use std::fmt;

use crate::checked::ArithmeticError;

/// Error raised when text cannot be parsed as a duration.
///
/// Carries the offending input and a byte offset pointing at the part of the
/// text the parser gave up on. An arithmetic overflow hit while reading the
/// seconds value surfaces through here as well, with the overflow kept as
/// the error source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    text: String,
    offset: usize,
    cause: Option<ArithmeticError>,
}

impl ParseError {
    pub(crate) fn new(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset,
            cause: None,
        }
    }

    pub(crate) fn with_cause(
        text: impl Into<String>,
        offset: usize,
        cause: ArithmeticError,
    ) -> Self {
        Self {
            text: text.into(),
            offset,
            cause: Some(cause),
        }
    }

    /// The input that failed to parse.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset into the input near which parsing failed.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duration could not be parsed: {:?} (offset {})",
            self.text, self.offset
        )?;
        if let Some(cause) = self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_ref().map(|c| c as &(dyn Error + 'static))
    }
}
