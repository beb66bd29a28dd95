//! Shared configuration constants for parsing and discovery.

use std::time::Duration;

/// Number of tasks shown by the default view.
pub const DEFAULT_TASK_COUNT: usize = 10;

/// Section heading depth beyond which display degrades gracefully.
/// The parser records the real depth regardless; see `ParseErrorKind::DepthOverflow`.
pub const MAX_NESTING_DEPTH: usize = 5;

/// Marker names identifying a version-control root. A marker may be a file
/// or a directory; git worktrees use a `.git` file.
pub const VCS_MARKERS: [&str; 3] = [".git", ".hg", ".svn"];

/// Project marker: the directory holding numbered feature folders.
pub const SPECS_DIR_NAME: &str = "specs";

/// Name of the checklist document inside a feature directory.
pub const TASKS_FILE_NAME: &str = "tasks.md";

/// Upper bound on upward ancestor traversal during discovery.
pub const MAX_SEARCH_LEVELS: usize = 10;

/// Deadline for the external VCS probe; guards against hangs on slow or
/// network-mounted filesystems.
pub const VCS_PROBE_TIMEOUT: Duration = Duration::from_secs(2);
