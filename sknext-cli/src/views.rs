//! View projection over a parsed document.
//!
//! Every view is simple list slicing over the immutable model: select the
//! uncompleted tasks (or phases, or sections), take the first N, render as
//! text. Rendering assumes the caller already checked
//! `Document::is_parsed()`.
//!
//! Sections nested beyond [`MAX_NESTING_DEPTH`] render with their heading
//! markers capped at the maximum: the display degrades to the phase plus
//! the task's own section, while the model keeps the true depth.

use sknext_parser::tasks::constants::MAX_NESTING_DEPTH;
use sknext_parser::tasks::{Document, Phase, Section, Task};

const SEPARATOR_WIDTH: usize = 60;

/// Default view: the next `count` uncompleted tasks with their phase and
/// section context headings.
pub fn default_view(document: &Document, count: usize) -> String {
    let total_remaining = document.uncompleted_tasks().len();
    if total_remaining == 0 {
        return banner("All tasks complete!");
    }

    // count == 0 still shows one task; the footer owns the joke.
    let limit = if count == 0 { 1 } else { count };
    let mut out = String::new();
    let shown = render_tasks_with_context(&mut out, document, limit);

    out.push('\n');
    if count == 0 {
        out.push_str("Showing 0 tasks (for VERY large values of zero)\n");
    } else if shown < total_remaining {
        out.push_str(&format!(
            "Showing {shown} of {total_remaining} remaining tasks\n"
        ));
    } else {
        out.push_str(&format!("Showing all {total_remaining} remaining tasks\n"));
    }
    out
}

/// Phases-only view: headings of phases with uncompleted work.
pub fn phases_only_view(document: &Document) -> String {
    let phases = document.phases_with_uncompleted_work();
    if phases.is_empty() {
        return banner("All phases complete!");
    }

    let mut out = String::from("Phases with uncompleted work:\n\n");
    for phase in &phases {
        out.push_str(&phase_heading(phase));
        out.push('\n');
    }
    out.push_str(&format!(
        "\nShowing {} of {} phases\n",
        phases.len(),
        document.phases.len()
    ));
    out
}

/// Structure view: phases and sections with uncompleted work, no tasks.
pub fn structure_view(document: &Document) -> String {
    let phases = document.phases_with_uncompleted_work();
    if phases.is_empty() {
        return banner("All work complete!");
    }

    let mut out = String::from("Project structure with uncompleted work:\n\n");
    let mut section_count = 0;
    for phase in &phases {
        out.push_str(&phase_heading(phase));
        out.push('\n');
        for section in &phase.sections {
            if section.has_uncompleted_tasks() {
                out.push_str(&format!("  {}\n", section_heading(section)));
                section_count += 1;
            }
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "Showing {} phases with {} sections\n",
        phases.len(),
        section_count
    ));
    out
}

/// Combined view: all incomplete phases, a separator, then the next
/// `count` tasks with context.
pub fn combined_view(document: &Document, count: usize) -> String {
    let total_remaining = document.uncompleted_tasks().len();
    if total_remaining == 0 {
        return banner("All tasks complete!");
    }

    let phases = document.phases_with_uncompleted_work();
    let mut out = String::from("Incomplete phases:\n\n");
    for phase in &phases {
        out.push_str(&phase_heading(phase));
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&"\u{2500}".repeat(SEPARATOR_WIDTH));
    out.push_str("\n\n");
    out.push_str(&format!(
        "Next {} tasks:\n",
        count.min(total_remaining)
    ));

    let shown = render_tasks_with_context(&mut out, document, count);

    out.push('\n');
    if shown < total_remaining {
        out.push_str(&format!(
            "Showing {} phases and {shown} of {total_remaining} remaining tasks\n",
            phases.len()
        ));
    } else {
        out.push_str(&format!(
            "Showing {} phases and all {total_remaining} remaining tasks\n",
            phases.len()
        ));
    }
    out
}

/// Tasks-only view: bare task lines, no headings.
pub fn tasks_only_view(document: &Document, count: usize) -> String {
    let uncompleted = document.uncompleted_tasks();
    let total_remaining = uncompleted.len();
    if total_remaining == 0 {
        return banner("All tasks complete!");
    }

    let mut out = String::new();
    let shown = count.min(total_remaining);
    for task in &uncompleted[..shown] {
        out.push_str(&render_task(task));
        out.push('\n');
    }

    out.push('\n');
    if shown < total_remaining {
        out.push_str(&format!(
            "Showing {shown} of {total_remaining} remaining tasks\n"
        ));
    } else {
        out.push_str(&format!("Showing all {total_remaining} remaining tasks\n"));
    }
    out
}

/// Walk the tree in file order, printing phase/section headings lazily as
/// the shown tasks cross into them. Returns how many tasks were rendered.
fn render_tasks_with_context(out: &mut String, document: &Document, limit: usize) -> usize {
    let mut shown = 0;
    'phases: for phase in &document.phases {
        let mut phase_printed = false;
        for section in &phase.sections {
            let mut section_printed = false;
            for task in section.tasks.iter().filter(|task| !task.completed) {
                if shown == limit {
                    break 'phases;
                }
                if !phase_printed {
                    out.push('\n');
                    out.push_str(&phase_heading(phase));
                    out.push('\n');
                    phase_printed = true;
                }
                if !section_printed {
                    out.push('\n');
                    out.push_str(&section_heading(section));
                    out.push('\n');
                    section_printed = true;
                }
                out.push_str(&render_task(task));
                out.push('\n');
                shown += 1;
            }
        }
    }
    shown
}

fn phase_heading(phase: &Phase) -> String {
    format!("## Phase {}: {}", phase.number, phase.title)
}

fn section_heading(section: &Section) -> String {
    let depth = section.level.min(MAX_NESTING_DEPTH);
    format!("{} {}", "#".repeat(depth), section.title)
}

/// Render one task line, pulling `[P]` and `[USn]` out of the description
/// and re-printing them as leading markers.
fn render_task(task: &Task) -> String {
    let mut description = task.description.clone();
    let mut markers = String::new();
    if task.priority {
        description = description.replace("[P]", "");
        markers.push_str("[P] ");
    }
    if let Some(tag) = &task.story_tag {
        description = description.replace(&format!("[{tag}]"), "");
        markers.push_str(&format!("[{tag}] "));
    }
    format!("- [ ] {} {}{}", task.id, markers, description.trim())
}

fn banner(message: &str) -> String {
    format!("\u{2713} {message}\n")
}
