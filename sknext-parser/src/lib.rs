//! # sknext-parser
//!
//! Parsing and discovery for speckit `tasks.md` checklists.
//!
//! A tasks file is a fixed line dialect (not general Markdown) describing a
//! three-level plan: `## Phase N: Title` headings contain `###`-or-deeper
//! section headings, which contain `- [ ] Tnnn ...` task lines. The library
//! has two halves:
//!
//! - [`tasks`] — a single-pass, line-oriented parser that classifies each
//!   line, rebuilds the phase/section/task hierarchy, and collects every
//!   malformed or out-of-place line as a structured error with its exact
//!   source location. A document with any fatal error is considered not
//!   parsed; scanning still runs to completion so one pass reports every
//!   problem.
//! - [`discovery`] — locates the authoritative tasks file when no explicit
//!   path is given, via a layered root search (VCS probe, marker walk,
//!   `specs/` walk) followed by highest-ordinal feature-directory selection.

pub mod discovery;
pub mod tasks;
