//! Document loading front-end.
//!
//! `DocumentLoader` reads source text from a file or a string and runs the
//! parser over it. Used by both production code and tests.

use std::fs;
use std::path::{Path, PathBuf};

use super::ast::Document;
use super::parsing::{parse_str, ParseOptions};

/// Error that can occur when loading a tasks file.
#[derive(Debug, Clone)]
pub enum LoaderError {
    /// The file could not be read.
    Io { path: PathBuf, message: String },
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::Io { path, message } => {
                write!(f, "failed to read {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for LoaderError {}

/// Loads source text and parses it into a [`Document`].
///
/// The file is read to completion up front; the handle is closed before any
/// parsing starts, on success and failure alike.
pub struct DocumentLoader {
    source: String,
    path: PathBuf,
}

impl DocumentLoader {
    /// Load from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| LoaderError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Ok(DocumentLoader {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Load from an in-memory string.
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: source.into(),
            path: PathBuf::from("<string>"),
        }
    }

    /// Parse with default (strict) options.
    pub fn parse(&self) -> Document {
        self.parse_with(ParseOptions::default())
    }

    /// Parse with explicit options.
    pub fn parse_with(&self, options: ParseOptions) -> Document {
        parse_str(&self.source, &self.path, options)
    }

    /// The raw source text.
    pub fn source_ref(&self) -> &str {
        &self.source
    }
}

/// Parse a tasks file with default options. Production entry point.
pub fn parse_tasks_file<P: AsRef<Path>>(path: P) -> Result<Document, LoaderError> {
    Ok(DocumentLoader::from_path(path)?.parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_parses() {
        let loader = DocumentLoader::from_string("## Phase 1: X\n### S\n- [ ] T001 Do\n");
        let document = loader.parse();
        assert!(document.is_parsed());
        assert_eq!(document.phases.len(), 1);
    }

    #[test]
    fn from_path_nonexistent_is_an_io_error() {
        let result = DocumentLoader::from_path("no/such/tasks.md");
        assert!(matches!(result, Err(LoaderError::Io { .. })));
    }

    #[test]
    fn io_error_names_the_path() {
        let Err(error) = DocumentLoader::from_path("no/such/tasks.md") else {
            panic!("expected an error");
        };
        assert!(error.to_string().contains("no/such/tasks.md"));
    }

    #[test]
    fn source_ref_returns_raw_text() {
        let loader = DocumentLoader::from_string("hello\n");
        assert_eq!(loader.source_ref(), "hello\n");
    }
}
