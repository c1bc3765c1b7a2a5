//! Command line arguments

use clap::Parser as ClapParser;
use std::path::PathBuf;

/// Check that a JavaScript file is syntactically valid.
///
/// Files ending in `.mjs` are checked as modules, everything else as
/// classic scripts.
#[derive(Debug, Clone, PartialEq, Eq, ClapParser)]
#[command(name = "validate", version)]
pub struct Cli {
    /// JavaScript file to check
    pub path: PathBuf,
}

impl Cli {
    /// Arguments for checking `path`
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}
