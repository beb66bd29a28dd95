//! Line classification.
//!
//! Classifies a single line of a tasks file into one of the recognized
//! shapes. The dialect is fixed, not general Markdown:
//!
//! ```text
//! phase_heading   ::= "## Phase " <int> ":" <title>
//! section_heading ::= <3+ "#"> <title>
//! purpose_line    ::= "**Purpose**:" <text>
//! task_line       ::= "- [" <1 char> "] " <id> [" [P]"] [" [US" <digits> "]"] " " <description>
//! id              ::= "T" <3+ digits>
//! ```
//!
//! Classification is pure and stateless; deciding whether a shape is legal
//! in its position (orphaned sections, orphaned tasks) is the hierarchy
//! builder's job. Lines that clearly attempt a known shape but violate its
//! grammar classify as `Malformed` with the precise violation, so the
//! builder can report them instead of silently reinterpreting them.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ast::ParseErrorKind;

static PHASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^## Phase (\d+):\s*(.+)$").expect("valid regex"));
static PHASE_LOOKING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#+)\s*Phase\b").expect("valid regex"));
static SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{3,})\s+(.+)$").expect("valid regex"));
static PURPOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\*Purpose\*\*:\s*(.*)$").expect("valid regex"));
static TASK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-\s+\[(.)\]\s+(T\d{3,})\s+(.+)$").expect("valid regex"));
static TASK_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^T\d{3,}$").expect("valid regex"));
static STORY_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[US(\d+)\]").expect("valid regex"));
static TASK_LOOKING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*+]\s*\[").expect("valid regex"));

/// One classified line of a tasks file.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Only whitespace.
    Blank,
    /// `## Phase <number>: <title>`
    PhaseHeading { number: u32, title: String },
    /// `### <title>` or deeper; `level` is the count of `#` markers.
    SectionHeading { level: usize, title: String },
    /// `**Purpose**: <text>` — supplementary section metadata.
    Purpose { text: String },
    /// `- [<checkbox>] <id> <description>`
    Task {
        checkbox: char,
        id: String,
        priority: bool,
        story_tag: Option<String>,
        description: String,
    },
    /// A recognizable shape violating its grammar.
    Malformed { kind: ParseErrorKind, message: String },
    /// Anything else with visible content.
    Unrecognized,
}

/// Classify a single line of text.
pub fn classify_line(line: &str) -> Line {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if let Some(caps) = PURPOSE_RE.captures(line) {
        return Line::Purpose {
            text: caps[1].trim().to_string(),
        };
    }
    if line.starts_with('#') {
        return classify_heading(line);
    }
    if let Some(caps) = TASK_RE.captures(line) {
        let checkbox = caps[1].chars().next().unwrap_or(' ');
        let description = caps[3].trim().to_string();
        let story_tag = STORY_TAG_RE
            .captures(&description)
            .map(|tag| format!("US{}", &tag[1]));
        return Line::Task {
            checkbox,
            id: caps[2].to_string(),
            priority: description.contains("[P]"),
            story_tag,
            description,
        };
    }
    if TASK_LOOKING_RE.is_match(line) {
        return Line::Malformed {
            kind: ParseErrorKind::MalformedTask,
            message: diagnose_task(line),
        };
    }
    Line::Unrecognized
}

fn classify_heading(line: &str) -> Line {
    if let Some(caps) = PHASE_RE.captures(line) {
        let title = caps[2].trim();
        if title.is_empty() {
            return Line::Malformed {
                kind: ParseErrorKind::MalformedPhaseHeading,
                message: "phase heading is missing a title".to_string(),
            };
        }
        return match caps[1].parse::<u32>() {
            Ok(number) => Line::PhaseHeading {
                number,
                title: title.to_string(),
            },
            Err(_) => Line::Malformed {
                kind: ParseErrorKind::MalformedPhaseHeading,
                message: "phase number is out of range".to_string(),
            },
        };
    }
    let depth = line.chars().take_while(|&c| c == '#').count();
    if PHASE_LOOKING_RE.is_match(line) {
        return Line::Malformed {
            kind: ParseErrorKind::MalformedPhaseHeading,
            message: diagnose_phase(line, depth),
        };
    }
    if let Some(caps) = SECTION_RE.captures(line) {
        let title = caps[2].trim();
        if !title.is_empty() {
            return Line::SectionHeading {
                level: caps[1].len(),
                title: title.to_string(),
            };
        }
    }
    let rest = &line[depth..];
    let message = if depth < 3 {
        format!(
            "heading depth {depth} is not valid: sections use '###' or deeper, \
             phases use '## Phase <number>: <title>'"
        )
    } else if rest.trim().is_empty() {
        "section heading is missing a title".to_string()
    } else {
        "missing space between '#' markers and the section title".to_string()
    };
    Line::Malformed {
        kind: ParseErrorKind::MalformedSectionHeading,
        message,
    }
}

fn diagnose_phase(line: &str, depth: usize) -> String {
    if depth != 2 {
        format!("phase headings use exactly two '#' characters, found {depth}")
    } else if !line.contains(':') {
        "phase heading is missing ':' after the phase number".to_string()
    } else {
        "expected '## Phase <number>: <title>'".to_string()
    }
}

/// Explain why a task-looking line failed the task grammar.
fn diagnose_task(line: &str) -> String {
    if !line.starts_with('-') {
        return "task bullets must be '-'".to_string();
    }
    if line.starts_with("-[") {
        return "missing space between the bullet and the checkbox".to_string();
    }
    let Some(open) = line.find('[') else {
        return "expected '- [<char>] T<nnn> <description>'".to_string();
    };
    let Some(close) = line[open..].find(']') else {
        return "checkbox is missing its closing ']'".to_string();
    };
    let body = &line[open + 1..open + close];
    match body.chars().count() {
        0 => return "checkbox must contain exactly one character, found none".to_string(),
        1 => {}
        n => return format!("checkbox must contain exactly one character, found {n}"),
    }
    let after = &line[open + close + 1..];
    if !after.is_empty() && !after.starts_with(char::is_whitespace) {
        return "missing space after the checkbox".to_string();
    }
    let rest = after.trim_start();
    let Some(ident) = rest.split_whitespace().next() else {
        return "missing task identifier after the checkbox".to_string();
    };
    if !TASK_ID_RE.is_match(ident) {
        return format!(
            "invalid task identifier '{ident}': expected 'T' followed by at least three digits"
        );
    }
    "missing task description".to_string()
}
