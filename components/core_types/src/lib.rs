//! Shared vocabulary for the JavaScript syntax validator.
//!
//! This crate holds the small types every other component agrees on:
//! where something happened in a source buffer, and what went wrong there.
//!
//! # Overview
//!
//! - [`SourcePosition`] - Offset, line and column inside a source buffer
//! - [`JsError`] - A failure with its kind, message and position
//! - [`ErrorKind`] - Lexical, syntactic, nesting or internal failure
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, JsError, SourcePosition};
//!
//! let error = JsError::new(
//!     ErrorKind::SyntaxError,
//!     "Unexpected token ')'",
//!     Some(SourcePosition::new(3, 14, 40)),
//! );
//! assert_eq!(error.to_string(), "Unexpected token ')' (3:14)");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;

pub use error::{ErrorKind, JsError};
pub use source::SourcePosition;
