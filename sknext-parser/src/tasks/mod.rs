//! Tasks-file parsing: line classification, hierarchy building, document model.
//!
//! The pipeline is `raw text -> line classifier -> hierarchy builder ->
//! Document`. Each stage is its own module so it can be tested in isolation:
//!
//! - [`line`] classifies a single line into a closed [`line::Line`] variant.
//! - [`parsing`] consumes the classified stream in order and rebuilds the
//!   phase/section/task tree, collecting errors instead of aborting.
//! - [`ast`] is the immutable result tree plus the error taxonomy.
//! - [`loader`] is the file/string front-end used by production code and tests.

pub mod ast;
pub mod constants;
pub mod line;
pub mod loader;
pub mod parsing;

pub use ast::{Document, ParseError, ParseErrorKind, Phase, Section, Task};
pub use loader::{parse_tasks_file, DocumentLoader, LoaderError};
pub use parsing::ParseOptions;
