//! Parser error types and helpers

use core_types::{ErrorKind, JsError, SourcePosition};

/// Result type used throughout the scanner and grammar engine
pub type ParseResult<T> = Result<T, JsError>;

/// Create a lexical error at the position where the bad lexeme begins
pub fn lex_error(message: impl Into<String>, position: SourcePosition) -> JsError {
    JsError::new(ErrorKind::LexError, message, Some(position))
}

/// Create a syntax error at a given position
pub fn syntax_error(message: impl Into<String>, position: SourcePosition) -> JsError {
    JsError::new(ErrorKind::SyntaxError, message, Some(position))
}

/// Create an unexpected token error
pub fn unexpected_token(expected: &str, got: &str, position: SourcePosition) -> JsError {
    syntax_error(format!("Expected {}, got {}", expected, got), position)
}

/// Create an unexpected end of input error
pub fn unexpected_eof(position: SourcePosition) -> JsError {
    syntax_error("Unexpected end of input", position)
}

/// Create the error raised when nesting exceeds the configured limit
pub fn too_deep(position: SourcePosition, limit: usize) -> JsError {
    JsError::new(
        ErrorKind::TooDeep,
        format!("Maximum nesting depth of {} exceeded", limit),
        Some(position),
    )
}
