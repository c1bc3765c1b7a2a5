//! JavaScript syntax validation.
//!
//! Decides whether a buffer is a syntactically valid ECMAScript script or
//! module. No tree is built: the outcome is accept, or the first error with
//! its line and column.
//!
//! # Overview
//!
//! - [`Scanner`] - Pull-based tokenizer driven by a [`LexGoal`] per request
//! - [`Parser`] - Recursive descent for statements, precedence climbing for
//!   expressions, automatic semicolon insertion; yields a [`Verdict`]
//! - [`Driver`] - Owns the buffer, appends the `"\n\0"` sentinel and turns
//!   the verdict into a [`ParseOutcome`]
//! - [`BufferSource`] / [`ErrorSink`] - Where input comes from and where
//!   the failure goes
//!
//! # Example
//!
//! ```
//! use parser::{parse_buffer, ParseOutcome};
//!
//! assert_eq!(parse_buffer(b"a = 1\nb = 2"), ParseOutcome::Ok);
//!
//! let outcome = parse_buffer(b"a = 1 b = 2");
//! let record = outcome.error_record().unwrap();
//! assert_eq!((record.line, record.column), (1, 7));
//! ```
//!
//! # Tracing
//!
//! The driver logs parse start and verdict at `debug`; the grammar engine
//! logs inserted semicolons and regex rescans at `trace`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod driver;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod source;
mod stack;

pub use driver::{parse_buffer, parse_file, parse_str, Driver, ErrorRecord, ErrorState, ParseOutcome};
pub use error::ParseResult;
pub use lexer::{Keyword, LexGoal, Punctuator, Scanner, Token, TokenKind};
pub use options::{ParseOptions, SourceType, DEFAULT_MAX_DEPTH};
pub use parser::{Parser, Verdict};
pub use source::{BufferSource, CollectingSink, ErrorSink, FileSource, MemorySource};
