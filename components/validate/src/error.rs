//! Error types for the CLI

use parser::ErrorRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Ways a validation run can fail
#[derive(Debug, Error)]
pub enum CliError {
    /// The file is not valid JavaScript
    #[error("Syntax error at {}:{}:{}: {}", .path.display(), .record.line, .record.column, .record.message)]
    Syntax {
        /// File that was checked
        path: PathBuf,
        /// First error in the file
        record: ErrorRecord,
    },

    /// Nesting limit exceeded
    #[error("Nesting too deep at {}:{}:{}: {}", .path.display(), .record.line, .record.column, .record.message)]
    TooDeep {
        /// File that was checked
        path: PathBuf,
        /// Where the limit was crossed
        record: ErrorRecord,
    },

    /// The file could not be read
    #[error("Internal or IO error: {0}")]
    Io(String),

    /// The parser failed for reasons unrelated to the input
    #[error("Internal or IO error: {0}")]
    Internal(String),
}

impl CliError {
    /// Process exit code: 1 for invalid JavaScript, 2 for everything else
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Syntax { record, .. } | CliError::TooDeep { record, .. }
                if record.kind.is_syntax_failure() =>
            {
                1
            }
            CliError::Syntax { .. }
            | CliError::TooDeep { .. }
            | CliError::Io(_)
            | CliError::Internal(_) => 2,
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
