//! Collaborator interfaces around the Driver.
//!
//! A [`BufferSource`] produces the complete bytes of one input together
//! with a name for messages. An [`ErrorSink`] receives the single failure
//! of a parse, if there is one.

use std::io;
use std::path::{Path, PathBuf};

/// Name used for inputs that have none.
pub const UNNAMED_INPUT: &str = "<stdin>";

/// Anything that can produce a complete, immutable input buffer.
pub trait BufferSource {
    /// Human-readable name used in error messages
    fn name(&self) -> &str;

    /// Produce the whole buffer
    fn read(&self) -> io::Result<Vec<u8>>;
}

/// Receives the one failure of a parse.
pub trait ErrorSink {
    /// Report an error at a 1-based line and column
    fn report(&mut self, line: u32, column: u32, message: &str);
}

/// A file on disk, read in full on demand.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    /// Source for the file at `path`; the name is the path as given
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BufferSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}

/// An in-memory buffer.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: Option<String>,
    bytes: Vec<u8>,
}

impl MemorySource {
    /// Unnamed buffer; messages call it `<stdin>`
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: None,
            bytes: bytes.into(),
        }
    }

    /// Give the buffer a name for messages
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl BufferSource for MemorySource {
    fn name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNNAMED_INPUT,
        }
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Error sink that keeps the reported error.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectingSink {
    /// Reported `(line, column, message)` triples in order
    pub reports: Vec<(u32, u32, String)>,
}

impl ErrorSink for CollectingSink {
    fn report(&mut self, line: u32, column: u32, message: &str) {
        self.reports.push((line, column, message.to_string()));
    }
}
