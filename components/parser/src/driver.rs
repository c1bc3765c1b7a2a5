//! Driver: owns the input buffer, runs the scanner and grammar engine over
//! it, and turns the verdict into a [`ParseOutcome`].
//!
//! The buffer is copied and terminated with `"\n\0"` before parsing, so the
//! end of input always sits on a line boundary. Each call builds a fresh
//! parser; nothing survives from one parse to the next.

use crate::lexer::position_at;
use crate::options::{ParseOptions, SourceType};
use crate::parser::{Parser, Verdict};
use crate::source::{BufferSource, ErrorSink, FileSource, MemorySource};
use core_types::{ErrorKind, JsError, SourcePosition};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, error, warn};

/// Bytes appended to every buffer: a line terminator and a NUL sentinel.
pub const SENTINEL: &[u8] = b"\n\0";

/// The one failure of a parse, with a 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// `LexError`, `SyntaxError` or `TooDeep`
    pub kind: ErrorKind,
    /// Line of the failure
    pub line: u32,
    /// Column of the failure
    pub column: u32,
    /// Byte offset of the failure in the caller's buffer
    pub offset: usize,
    /// Human-readable message
    pub message: String,
}

impl ErrorRecord {
    /// Build a record from an error, positioned at the start if it has none
    pub fn from_error(error: &JsError) -> Self {
        let position = error.source_position.unwrap_or_else(SourcePosition::start);
        Self {
            kind: error.kind,
            line: position.line,
            column: position.column,
            offset: position.offset,
            message: error.message.clone(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Holds at most one error record. The first record written wins.
#[derive(Debug, Default)]
pub struct ErrorState {
    record: Option<ErrorRecord>,
}

impl ErrorState {
    /// Empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `error` unless a record already exists. Returns whether it was stored.
    pub fn record(&mut self, error: &JsError) -> bool {
        if self.record.is_some() {
            return false;
        }
        self.record = Some(ErrorRecord::from_error(error));
        true
    }

    /// The stored record
    pub fn get(&self) -> Option<&ErrorRecord> {
        self.record.as_ref()
    }

    /// Consume the state, yielding the stored record
    pub fn into_record(self) -> Option<ErrorRecord> {
        self.record
    }
}

/// Result of parsing one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The buffer is a valid program
    Ok,
    /// Lexical or grammar violation
    SyntaxError(ErrorRecord),
    /// Nesting limit exceeded
    TooDeep(ErrorRecord),
    /// The buffer could not be produced, or the pipeline failed internally
    InternalError(String),
}

impl ParseOutcome {
    /// Whether the buffer was accepted
    pub fn is_ok(&self) -> bool {
        matches!(self, ParseOutcome::Ok)
    }

    /// The positioned error, for `SyntaxError` and `TooDeep`
    pub fn error_record(&self) -> Option<&ErrorRecord> {
        match self {
            ParseOutcome::SyntaxError(record) | ParseOutcome::TooDeep(record) => Some(record),
            ParseOutcome::Ok | ParseOutcome::InternalError(_) => None,
        }
    }

    /// Forward the failure, if any, to `sink`. Internal errors carry no
    /// position and are reported at line 0, column 0.
    pub fn report_to(&self, sink: &mut dyn ErrorSink) {
        match self {
            ParseOutcome::Ok => {}
            ParseOutcome::SyntaxError(record) | ParseOutcome::TooDeep(record) => {
                sink.report(record.line, record.column, &record.message);
            }
            ParseOutcome::InternalError(detail) => sink.report(0, 0, detail),
        }
    }

    fn from_state(state: ErrorState) -> Self {
        match state.into_record() {
            None => ParseOutcome::Ok,
            Some(record) if record.kind == ErrorKind::TooDeep => ParseOutcome::TooDeep(record),
            Some(record) if record.kind == ErrorKind::InternalError => {
                ParseOutcome::InternalError(record.message)
            }
            Some(record) => ParseOutcome::SyntaxError(record),
        }
    }
}

/// Runs whole parses with a fixed set of options.
///
/// # Example
///
/// ```
/// use parser::{Driver, ParseOptions, ParseOutcome};
///
/// let driver = Driver::new(ParseOptions::default());
/// assert_eq!(driver.parse_buffer(b"let answer = 42"), ParseOutcome::Ok);
/// assert!(!driver.parse_buffer(b"let = = 1").is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Driver {
    options: ParseOptions,
}

impl Driver {
    /// Create a driver
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parse an unnamed in-memory buffer
    pub fn parse_buffer(&self, buffer: &[u8]) -> ParseOutcome {
        self.parse_named(crate::source::UNNAMED_INPUT, buffer)
    }

    /// Read `source` in full and parse it
    pub fn parse_source(&self, source: &dyn BufferSource) -> ParseOutcome {
        match source.read() {
            Ok(bytes) => self.parse_named(source.name(), &bytes),
            Err(err) => {
                warn!(input = source.name(), error = %err, "could not read input");
                ParseOutcome::InternalError(format!("{}: {}", source.name(), err))
            }
        }
    }

    /// Read the file at `path` and parse it. A `.mjs` file is parsed as a
    /// module, anything else as a script.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> ParseOutcome {
        let path = path.as_ref();
        let options = self
            .options
            .with_source_type(SourceType::from_path(path));
        Driver::new(options).parse_source(&FileSource::new(path))
    }

    fn parse_named(&self, name: &str, buffer: &[u8]) -> ParseOutcome {
        debug!(
            input = name,
            bytes = buffer.len(),
            source_type = ?self.options.source_type,
            "parse started"
        );
        let mut state = ErrorState::new();
        match self.run(buffer) {
            Ok(Verdict::Accept) => {}
            Ok(Verdict::Reject(err)) => {
                state.record(&err);
            }
            Err(detail) => {
                error!(input = name, detail = %detail, "parser failed internally");
                return ParseOutcome::InternalError(detail);
            }
        }
        match state.get() {
            Some(record) => debug!(input = name, kind = record.kind.as_str(), at = %record, "rejected"),
            None => debug!(input = name, "accepted"),
        }
        ParseOutcome::from_state(state)
    }

    /// Copy, terminate, decode and parse. A panic becomes an `Err`.
    fn run(&self, buffer: &[u8]) -> Result<Verdict, String> {
        let mut owned = Vec::with_capacity(buffer.len() + SENTINEL.len());
        owned.extend_from_slice(buffer);
        owned.extend_from_slice(SENTINEL);

        let text = match std::str::from_utf8(&owned) {
            Ok(text) => text,
            Err(err) => return Ok(Verdict::Reject(invalid_utf8(&owned, err.valid_up_to()))),
        };

        let options = self.options;
        panic::catch_unwind(AssertUnwindSafe(|| Parser::new(text, options).parse()))
            .map_err(|payload| {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                format!("internal parser failure: {}", detail)
            })
    }
}

fn invalid_utf8(bytes: &[u8], valid_up_to: usize) -> JsError {
    let prefix = std::str::from_utf8(&bytes[..valid_up_to]).unwrap_or_default();
    JsError::new(
        ErrorKind::LexError,
        "Invalid UTF-8 sequence",
        Some(position_at(prefix, valid_up_to)),
    )
}

/// Parse an in-memory buffer as a script with default options
pub fn parse_buffer(buffer: &[u8]) -> ParseOutcome {
    Driver::default().parse_buffer(buffer)
}

/// Parse a file with default options; `.mjs` files are modules
pub fn parse_file(path: impl AsRef<Path>) -> ParseOutcome {
    Driver::default().parse_file(path)
}

/// Parse a named in-memory string with default options
pub fn parse_str(name: &str, text: &str) -> ParseOutcome {
    Driver::default().parse_source(&MemorySource::new(text).with_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CollectingSink;
    use std::io::Write;

    fn error_of(outcome: &ParseOutcome) -> &ErrorRecord {
        outcome.error_record().expect("expected an error record")
    }

    #[test]
    fn test_accepts_valid_buffer() {
        assert_eq!(parse_buffer(b"a = 1\nb = 2"), ParseOutcome::Ok);
        assert_eq!(parse_buffer(b""), ParseOutcome::Ok);
    }

    #[test]
    fn test_end_of_input_is_a_line_boundary() {
        assert_eq!(parse_buffer(b"var x = 1"), ParseOutcome::Ok);
        assert_eq!(parse_buffer(b"x++"), ParseOutcome::Ok);
    }

    #[test]
    fn test_syntax_error_record() {
        let outcome = parse_buffer(b"a = 1 b = 2");
        let record = error_of(&outcome);
        assert!(matches!(outcome, ParseOutcome::SyntaxError(_)));
        assert_eq!(record.kind, ErrorKind::SyntaxError);
        assert_eq!((record.line, record.column), (1, 7));
        assert_eq!(record.offset, 6);
    }

    #[test]
    fn test_unexpected_end_of_input_position() {
        let outcome = parse_buffer(b"function f() { ");
        let record = error_of(&outcome);
        assert_eq!(record.message, "Unexpected end of input");
        assert_eq!((record.line, record.column), (1, 16));

        let outcome = parse_buffer(b"if (x) {\n  y();\n");
        let record = error_of(&outcome);
        assert_eq!((record.line, record.column), (3, 1));
    }

    #[test]
    fn test_lone_carriage_return_ends_the_last_line() {
        for buffer in [&b"function f() {\r"[..], b"function f() {\n", b"function f() {\r\n"] {
            let outcome = parse_buffer(buffer);
            let record = error_of(&outcome);
            assert_eq!(record.message, "Unexpected end of input");
            assert_eq!((record.line, record.column), (2, 1));
        }

        let outcome = parse_buffer(b"a = 1\rb = 2\r\rc +* 3");
        assert_eq!((error_of(&outcome).line, error_of(&outcome).column), (4, 4));
    }

    #[test]
    fn test_unterminated_string_points_at_quote() {
        let outcome = parse_buffer(b"var s = 'abc");
        let record = error_of(&outcome);
        assert_eq!(record.kind, ErrorKind::LexError);
        assert_eq!((record.line, record.column), (1, 9));
    }

    #[test]
    fn test_invalid_utf8_is_a_lex_error() {
        let outcome = parse_buffer(b"var a = 1;\nvar \xff = 2;");
        let record = error_of(&outcome);
        assert_eq!(record.kind, ErrorKind::LexError);
        assert_eq!((record.line, record.column), (2, 5));
        assert_eq!(record.offset, 15);
    }

    #[test]
    fn test_too_deep_is_distinct() {
        let source = format!("x = {}1{}", "[".repeat(64), "]".repeat(64));
        let driver = Driver::new(ParseOptions::default().with_max_depth(32));
        let outcome = driver.parse_buffer(source.as_bytes());
        assert!(matches!(outcome, ParseOutcome::TooDeep(_)));
        assert_eq!(error_of(&outcome).kind, ErrorKind::TooDeep);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let driver = Driver::default();
        let buffer = b"function f() { return\na + b }\nf(";
        assert_eq!(driver.parse_buffer(buffer), driver.parse_buffer(buffer));
    }

    #[test]
    fn test_error_state_first_writer_wins() {
        let mut state = ErrorState::new();
        let first = JsError::new(
            ErrorKind::SyntaxError,
            "first",
            Some(SourcePosition::new(2, 3, 10)),
        );
        let second = JsError::new(ErrorKind::LexError, "second", None);
        assert!(state.get().is_none());
        assert!(state.record(&first));
        assert!(!state.record(&second));
        assert_eq!(state.get().map(|r| r.message.as_str()), Some("first"));
        let record = state.into_record().unwrap();
        assert_eq!(record.message, "first");
        assert_eq!((record.line, record.column), (2, 3));
    }

    #[test]
    fn test_missing_file_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = parse_file(dir.path().join("missing.js"));
        assert!(matches!(outcome, ParseOutcome::InternalError(_)));
        assert!(outcome.error_record().is_none());
    }

    #[test]
    fn test_parse_file_picks_module_for_mjs() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("lib.mjs");
        let script = dir.path().join("lib.js");
        for path in [&module, &script] {
            let mut file = std::fs::File::create(path).unwrap();
            file.write_all(b"export const answer = 42;\n").unwrap();
        }
        assert_eq!(parse_file(&module), ParseOutcome::Ok);
        assert!(matches!(parse_file(&script), ParseOutcome::SyntaxError(_)));
    }

    #[test]
    fn test_report_to_sink() {
        let mut sink = CollectingSink::default();
        ParseOutcome::Ok.report_to(&mut sink);
        assert!(sink.reports.is_empty());

        parse_str("inline.js", "let = = 1").report_to(&mut sink);
        assert_eq!(sink.reports.len(), 1);
        assert_eq!(sink.reports[0].0, 1);
    }
}
