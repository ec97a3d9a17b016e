//! Parse errors for the JSON recognizer chain

use thiserror::Error;

/// Result type for parse operations
pub type ParseResult<T> = Result<T, ParseError>;

/// JSON parse failures.
///
/// Offsets are byte offsets into the original input text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unexpected end of input: document is empty")]
    EmptyInput,

    #[error("Cannot find value type at offset {offset}")]
    NoRecognizer { offset: usize },

    #[error("Expected '{token}' at offset {offset}")]
    Expected { token: char, offset: usize },

    #[error("Unterminated {kind} starting at offset {offset}")]
    Unterminated { kind: &'static str, offset: usize },

    #[error("Invalid property name at offset {offset}")]
    InvalidPropertyName { offset: usize },

    #[error("Integer literal '{literal}' at offset {offset} does not fit in 32 bits")]
    IntegerOutOfRange { literal: String, offset: usize },

    #[error("Unexpected trailing input at offset {offset}")]
    TrailingInput { offset: usize },

    #[error("Nesting exceeds {limit} levels")]
    TooDeep { limit: usize },

    #[error("Pattern for {name} does not compile: {reason}")]
    InvalidPattern { name: &'static str, reason: String },
}

impl ParseError {
    /// Returns the byte offset the error refers to, if any
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::EmptyInput
            | ParseError::TooDeep { .. }
            | ParseError::InvalidPattern { .. } => None,
            ParseError::NoRecognizer { offset }
            | ParseError::Expected { offset, .. }
            | ParseError::Unterminated { offset, .. }
            | ParseError::InvalidPropertyName { offset }
            | ParseError::IntegerOutOfRange { offset, .. }
            | ParseError::TrailingInput { offset } => Some(*offset),
        }
    }
}
