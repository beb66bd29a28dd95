//! Document model for parsed tasks files.
//!
//! Strict tree ownership: a [`Document`] owns its [`Phase`]s, a phase owns
//! its [`Section`]s, a section owns its [`Task`]s. Everything is built once
//! during a parse pass and never mutated afterwards. Completion counts are
//! computed on demand rather than stored, so they cannot go stale.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// A single checklist line item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    /// Identifier of the form `T` followed by three or more digits.
    pub id: String,
    /// Full description text after the identifier, tags included.
    pub description: String,
    /// True iff the checkbox body was anything other than a single space.
    pub completed: bool,
    /// True if the description carries a `[P]` marker.
    pub priority: bool,
    /// Story identifier (e.g. `US1`) if a `[USn]` tag is present.
    pub story_tag: Option<String>,
    /// 1-based source line number.
    pub line_number: usize,
    /// Original line text, verbatim.
    pub raw_line: String,
}

/// A grouping of related tasks within a phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    /// Heading depth: 3 for `###`, 4 for `####`, and so on. Depths beyond
    /// the configured maximum are kept as-is; overflow is advisory.
    pub level: usize,
    /// Tasks in file order.
    pub tasks: Vec<Task>,
    pub line_number: usize,
    /// Text of a `**Purpose**:` line attached to this section, if any.
    pub purpose: Option<String>,
}

impl Section {
    pub fn has_uncompleted_tasks(&self) -> bool {
        self.tasks.iter().any(|task| !task.completed)
    }

    pub fn uncompleted_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }
}

/// A major development stage containing multiple sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phase {
    pub number: u32,
    /// Phase name without the `Phase N:` prefix.
    pub title: String,
    /// Sections in file order.
    pub sections: Vec<Section>,
    pub line_number: usize,
}

impl Phase {
    pub fn has_uncompleted_work(&self) -> bool {
        self.sections.iter().any(Section::has_uncompleted_tasks)
    }

    pub fn uncompleted_task_count(&self) -> usize {
        self.sections.iter().map(Section::uncompleted_count).sum()
    }

    pub fn total_task_count(&self) -> usize {
        self.sections.iter().map(Section::total_count).sum()
    }
}

/// The parsed tasks file: phases in file order plus every collected error.
///
/// Callers must check [`Document::is_parsed`] before projecting views; a
/// document with fatal errors is best-effort diagnostics, not usable data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub source: PathBuf,
    pub phases: Vec<Phase>,
    pub errors: Vec<ParseError>,
}

impl Document {
    /// All tasks across all phases, in file order.
    pub fn all_tasks(&self) -> impl Iterator<Item = &Task> {
        self.phases
            .iter()
            .flat_map(|phase| phase.sections.iter())
            .flat_map(|section| section.tasks.iter())
    }

    /// Uncompleted tasks in file order.
    pub fn uncompleted_tasks(&self) -> Vec<&Task> {
        self.all_tasks().filter(|task| !task.completed).collect()
    }

    /// Phases that still have remaining work.
    pub fn phases_with_uncompleted_work(&self) -> Vec<&Phase> {
        self.phases
            .iter()
            .filter(|phase| phase.has_uncompleted_work())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.all_tasks().all(|task| task.completed)
    }

    /// Errors that block a successful parse. `DepthOverflow` is advisory
    /// and excluded.
    pub fn fatal_errors(&self) -> Vec<&ParseError> {
        self.errors
            .iter()
            .filter(|error| error.kind.is_fatal())
            .collect()
    }

    /// True iff the document parsed without fatal errors.
    pub fn is_parsed(&self) -> bool {
        !self.errors.iter().any(|error| error.kind.is_fatal())
    }
}

/// Error taxonomy for strict-mode parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    /// A phase-looking line deviating from `## Phase <n>: <title>`.
    MalformedPhaseHeading,
    /// A heading whose depth or title violates the grammar.
    MalformedSectionHeading,
    /// A task-looking line with a bad bullet, checkbox, identifier, or tag.
    MalformedTask,
    /// A section heading before any phase heading.
    OrphanedSection,
    /// A task line before any section heading.
    OrphanedTask,
    /// A non-blank line matching no recognized shape.
    UnrecognizedContent,
    /// Section nesting exceeds the configured maximum. Advisory: recorded
    /// for display-time degradation, never blocks a successful parse.
    DepthOverflow,
}

impl ParseErrorKind {
    pub fn is_fatal(self) -> bool {
        !matches!(self, ParseErrorKind::DepthOverflow)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParseErrorKind::MalformedPhaseHeading => "MalformedPhaseHeading",
            ParseErrorKind::MalformedSectionHeading => "MalformedSectionHeading",
            ParseErrorKind::MalformedTask => "MalformedTask",
            ParseErrorKind::OrphanedSection => "OrphanedSection",
            ParseErrorKind::OrphanedTask => "OrphanedTask",
            ParseErrorKind::UnrecognizedContent => "UnrecognizedContent",
            ParseErrorKind::DepthOverflow => "DepthOverflow",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured diagnostic pointing at one offending line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseError {
    /// 1-based line number in the source file.
    pub line_number: usize,
    /// The offending line, verbatim.
    pub line_content: String,
    pub kind: ParseErrorKind,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {}: {}",
            self.line_number, self.kind, self.message
        )
    }
}
