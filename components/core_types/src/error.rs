//! Error types shared by the scanner, grammar engine and driver.

use crate::SourcePosition;
use thiserror::Error;

/// The kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed lexeme: bad escape, unterminated literal, stray character
    LexError,
    /// Grammar violation, including a semicolon ASI could not insert
    SyntaxError,
    /// Nesting limit exceeded
    TooDeep,
    /// Internal invariant violation or I/O failure
    InternalError,
}

impl ErrorKind {
    /// Human readable name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::LexError => "LexError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::TooDeep => "TooDeep",
            ErrorKind::InternalError => "InternalError",
        }
    }

    /// Whether this kind means the input is not valid JavaScript.
    pub fn is_syntax_failure(&self) -> bool {
        matches!(self, ErrorKind::LexError | ErrorKind::SyntaxError)
    }
}

/// An error with kind, message and the position it was detected at.
///
/// # Examples
///
/// ```
/// use core_types::{JsError, ErrorKind};
///
/// let error = JsError::new(ErrorKind::LexError, "Unterminated string literal", None);
///
/// assert_eq!(error.message, "Unterminated string literal");
/// assert_eq!(error.to_string(), "Unterminated string literal");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", position_suffix(.source_position))]
pub struct JsError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Source position where the error was detected
    pub source_position: Option<SourcePosition>,
}

impl JsError {
    /// Create a new error.
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        source_position: Option<SourcePosition>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source_position,
        }
    }
}

fn position_suffix(position: &Option<SourcePosition>) -> String {
    match position {
        Some(pos) => format!(" ({})", pos),
        None => String::new(),
    }
}
