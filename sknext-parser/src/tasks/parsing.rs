//! Hierarchy building.
//!
//! Consumes the classified line stream in order and rebuilds the
//! phase/section/task tree. The builder is a three-state machine — no
//! current phase, current phase without a section, current phase with a
//! section — held as two `Option`s of ordinary scoped state, alive for
//! exactly one parse call.
//!
//! Strict-mode policy: malformed, orphaned, and unrecognized lines are
//! never silently skipped. Each one is recorded with its 1-based line
//! number and verbatim text, and scanning continues so a single pass
//! reports every problem. The resulting [`Document`] is only usable when
//! its fatal error list is empty.

use std::path::{Path, PathBuf};

use super::ast::{Document, ParseError, ParseErrorKind, Phase, Section, Task};
use super::constants::MAX_NESTING_DEPTH;
use super::line::{classify_line, Line};

/// Knobs for one parse pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseOptions {
    /// When false, unrecognized prose lines are skipped instead of
    /// recorded. Malformed and orphaned lines are errors either way.
    pub strict: bool,
    /// Section depth beyond which an advisory `DepthOverflow` is recorded.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            strict: true,
            max_depth: MAX_NESTING_DEPTH,
        }
    }
}

/// Single-pass builder for the document tree.
pub struct HierarchyBuilder {
    options: ParseOptions,
    phases: Vec<Phase>,
    errors: Vec<ParseError>,
    current_phase: Option<Phase>,
    current_section: Option<Section>,
}

impl HierarchyBuilder {
    pub fn new(options: ParseOptions) -> Self {
        HierarchyBuilder {
            options,
            phases: Vec::new(),
            errors: Vec::new(),
            current_phase: None,
            current_section: None,
        }
    }

    /// Feed one line. `line_number` is 1-based.
    pub fn push_line(&mut self, line_number: usize, raw: &str) {
        match classify_line(raw) {
            Line::Blank => {}
            Line::PhaseHeading { number, title } => {
                self.flush_section();
                self.flush_phase();
                self.current_phase = Some(Phase {
                    number,
                    title,
                    sections: Vec::new(),
                    line_number,
                });
            }
            Line::SectionHeading { level, title } => {
                if self.current_phase.is_none() {
                    self.record(
                        line_number,
                        raw,
                        ParseErrorKind::OrphanedSection,
                        format!("section '{title}' appears before any phase heading"),
                    );
                    return;
                }
                self.flush_section();
                if level > self.options.max_depth {
                    self.record(
                        line_number,
                        raw,
                        ParseErrorKind::DepthOverflow,
                        format!(
                            "section nesting depth {level} exceeds the configured maximum of {}",
                            self.options.max_depth
                        ),
                    );
                }
                self.current_section = Some(Section {
                    title,
                    level,
                    tasks: Vec::new(),
                    line_number,
                    purpose: None,
                });
            }
            Line::Task {
                checkbox,
                id,
                priority,
                story_tag,
                description,
            } => match self.current_section.as_mut() {
                Some(section) => section.tasks.push(Task {
                    id,
                    description,
                    completed: checkbox != ' ',
                    priority,
                    story_tag,
                    line_number,
                    raw_line: raw.to_string(),
                }),
                None => {
                    let context = if self.current_phase.is_some() {
                        "before any section heading"
                    } else {
                        "before any phase or section heading"
                    };
                    self.record(
                        line_number,
                        raw,
                        ParseErrorKind::OrphanedTask,
                        format!("task {id} appears {context}"),
                    );
                }
            },
            Line::Purpose { text } => match self.current_section.as_mut() {
                Some(section) if section.purpose.is_none() => section.purpose = Some(text),
                Some(_) => self.record(
                    line_number,
                    raw,
                    ParseErrorKind::UnrecognizedContent,
                    "duplicate purpose line for this section".to_string(),
                ),
                None => self.record(
                    line_number,
                    raw,
                    ParseErrorKind::UnrecognizedContent,
                    "purpose line outside of a section".to_string(),
                ),
            },
            Line::Malformed { kind, message } => self.record(line_number, raw, kind, message),
            Line::Unrecognized => {
                if self.options.strict {
                    self.record(
                        line_number,
                        raw,
                        ParseErrorKind::UnrecognizedContent,
                        "line does not match any recognized shape".to_string(),
                    );
                }
            }
        }
    }

    /// Flush the trailing section/phase and produce the document.
    pub fn finish(mut self, source: PathBuf) -> Document {
        self.flush_section();
        self.flush_phase();
        Document {
            source,
            phases: self.phases,
            errors: self.errors,
        }
    }

    fn flush_section(&mut self) {
        if let Some(section) = self.current_section.take() {
            if let Some(phase) = self.current_phase.as_mut() {
                phase.sections.push(section);
            }
        }
    }

    fn flush_phase(&mut self) {
        if let Some(phase) = self.current_phase.take() {
            self.phases.push(phase);
        }
    }

    fn record(&mut self, line_number: usize, raw: &str, kind: ParseErrorKind, message: String) {
        self.errors.push(ParseError {
            line_number,
            line_content: raw.to_string(),
            kind,
            message,
        });
    }
}

/// Parse source text into a [`Document`] in one forward pass.
pub fn parse_str(source: &str, path: &Path, options: ParseOptions) -> Document {
    let mut builder = HierarchyBuilder::new(options);
    for (index, line) in source.lines().enumerate() {
        builder.push_line(index + 1, line);
    }
    builder.finish(path.to_path_buf())
}
