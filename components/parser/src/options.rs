//! Parse configuration

use std::path::Path;

/// Default nesting limit before a parse fails with `TooDeep`
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Which top-level grammar the buffer is parsed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceType {
    /// Classic script: sloppy by default, no import/export declarations
    #[default]
    Script,
    /// ES module: always strict, import/export and top-level await allowed
    Module,
}

impl SourceType {
    /// Pick the source type from a file name: `.mjs` is a module.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("mjs") => SourceType::Module,
            _ => SourceType::Script,
        }
    }
}

/// Options for one parse.
///
/// # Example
///
/// ```
/// use parser::{ParseOptions, SourceType};
///
/// let options = ParseOptions::default()
///     .with_source_type(SourceType::Module)
///     .with_max_depth(256);
/// assert_eq!(options.max_depth, 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Script or module grammar
    pub source_type: SourceType,
    /// Maximum nesting of statements, expressions and patterns
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_type: SourceType::Script,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Set the source type
    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }

    /// Set the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_from_path() {
        assert_eq!(SourceType::from_path("app.mjs"), SourceType::Module);
        assert_eq!(SourceType::from_path("app.js"), SourceType::Script);
        assert_eq!(SourceType::from_path("Makefile"), SourceType::Script);
    }

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.source_type, SourceType::Script);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }
}
