//! `validate`: JavaScript syntax checking from the command line.
//!
//! A thin collaborator over the parser's [`Driver`]: read one file, parse
//! it, and turn the outcome into a line of output and an exit code.
//!
//! # Tracing
//!
//! Set `RUST_LOG` (for example `RUST_LOG=parser=debug`) to get structured
//! logs on stderr. Without it nothing is installed and only the verdict
//! is printed.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;

pub use cli::Cli;
pub use error::{CliError, CliResult};

use parser::{BufferSource, Driver, FileSource, MemorySource, ParseOptions, ParseOutcome, SourceType};
use std::path::Path;
use std::sync::Once;
use tracing::{debug, info};

static TRACING_INIT: Once = Once::new();

/// Install a stderr `fmt` subscriber when `RUST_LOG` is set.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(filter)
                .init();
        }
    });
}

/// Check the file named on the command line
pub fn run(cli: &Cli) -> CliResult<()> {
    validate_path(&cli.path)
}

/// Read and parse one file. `.mjs` files are parsed as modules.
pub fn validate_path(path: &Path) -> CliResult<()> {
    let file = FileSource::new(path);
    let bytes = file
        .read()
        .map_err(|err| CliError::Io(format!("{}: {}", file.name(), err)))?;

    let source_type = SourceType::from_path(file.path());
    debug!(path = %file.path().display(), ?source_type, "validating");
    let driver = Driver::new(ParseOptions::default().with_source_type(source_type));
    let outcome = driver.parse_source(&MemorySource::new(bytes).with_name(file.name()));

    match outcome {
        ParseOutcome::Ok => {
            info!(path = %path.display(), "valid");
            Ok(())
        }
        ParseOutcome::SyntaxError(record) => Err(CliError::Syntax {
            path: path.to_path_buf(),
            record,
        }),
        ParseOutcome::TooDeep(record) => Err(CliError::TooDeep {
            path: path.to_path_buf(),
            record,
        }),
        ParseOutcome::InternalError(detail) => Err(CliError::Internal(detail)),
    }
}
