//! Auto-discovery of the tasks file.
//!
//! The caller supplies only a starting directory. Discovery runs an
//! ordered fallback chain where the first success wins:
//!
//! 1. VCS probe — ask the external tool for its top-level directory,
//!    bounded by a short deadline so a slow or network-mounted filesystem
//!    cannot hang the process. Any failure (tool absent, not a
//!    repository, timeout) is treated identically and falls through.
//! 2. Marker walk — from the canonicalized start directory, walk upward
//!    looking for a VCS marker (`.git`, `.hg`, `.svn`; file or directory).
//!    The nearest ancestor wins, preserving the probe's innermost-repo
//!    guarantee for nested repositories.
//! 3. `specs/` walk — the same upward walk, looking for the project
//!    marker directory instead.
//!
//! Both walks canonicalize the start path exactly once, so traversal
//! follows the real filesystem and cannot loop through a symlink pointing
//! back at an ancestor, and both stop after [`MAX_SEARCH_LEVELS`] levels
//! or at the filesystem root.
//!
//! Once a root is established, the highest-numbered `specs/###-*/`
//! directory is selected and its `tasks.md` returned. Equal ordinals (a
//! malformed but possible layout) tie-break deterministically to the
//! lexicographically greatest directory name.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tasks::constants::{
    MAX_SEARCH_LEVELS, SPECS_DIR_NAME, TASKS_FILE_NAME, VCS_MARKERS, VCS_PROBE_TIMEOUT,
};

static FEATURE_DIR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)-").expect("valid regex"));

/// Error that can occur during discovery. Discovery failures are fatal:
/// no partial result makes sense.
#[derive(Debug, Clone)]
pub enum DiscoveryError {
    /// Every fallback stage failed within the depth bound.
    NoRootDetected { start: PathBuf, levels: usize },
    /// A root was found but it has no `specs/` directory.
    RootFoundNoProjectMarker { root: PathBuf },
    /// `specs/` exists but holds no `###-name` feature directories.
    NoFeatureDirectories { specs_dir: PathBuf },
    /// The selected feature directory has no tasks file.
    ProjectMarkerFoundNoFile { feature_dir: PathBuf },
    /// Filesystem error while listing candidates.
    Io(String),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::NoRootDetected { start, levels } => write!(
                f,
                "no repository root found within {} levels of {}: the git probe failed, \
                 no VCS marker (.git, .hg, .svn) was found, and no specs/ directory was \
                 found; pass an explicit tasks.md path",
                levels,
                start.display()
            ),
            DiscoveryError::RootFoundNoProjectMarker { root } => write!(
                f,
                "repository root {} has no specs/ directory",
                root.display()
            ),
            DiscoveryError::NoFeatureDirectories { specs_dir } => write!(
                f,
                "no feature directories found in {} (expected format: ###-name)",
                specs_dir.display()
            ),
            DiscoveryError::ProjectMarkerFoundNoFile { feature_dir } => {
                write!(f, "no {} found in {}", TASKS_FILE_NAME, feature_dir.display())
            }
            DiscoveryError::Io(message) => write!(f, "discovery failed: {message}"),
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// Capability seam for the external VCS root query, so tests can stub it
/// without invoking a real tool.
pub trait VcsProbe {
    /// The top-level working directory enclosing `dir`, or `None` when the
    /// probe fails for any reason.
    fn toplevel(&self, dir: &Path) -> Option<PathBuf>;
}

/// Probes via `git rev-parse --show-toplevel`, which handles worktrees
/// (`.git` as a file) and reports the innermost repository when nested.
pub struct GitProbe {
    timeout: Duration,
}

impl GitProbe {
    pub fn new() -> Self {
        GitProbe {
            timeout: VCS_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        GitProbe { timeout }
    }
}

impl Default for GitProbe {
    fn default() -> Self {
        GitProbe::new()
    }
}

impl VcsProbe for GitProbe {
    fn toplevel(&self, dir: &Path) -> Option<PathBuf> {
        let mut child = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .stdin(Stdio::null())
            .spawn()
            .ok()?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(10));
                }
                // Timed out or the wait itself failed: kill and give up.
                _ => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
            }
        };
        if !status.success() {
            return None;
        }

        let mut output = String::new();
        child.stdout.take()?.read_to_string(&mut output).ok()?;
        let toplevel = output.trim();
        if toplevel.is_empty() {
            None
        } else {
            Some(PathBuf::from(toplevel))
        }
    }
}

/// Walk upward from `start` looking for a VCS marker. Returns the first
/// (nearest) directory containing one.
pub fn find_vcs_root(start: &Path, max_levels: usize) -> Option<PathBuf> {
    let mut current = start.canonicalize().ok()?;
    for _ in 0..max_levels {
        if VCS_MARKERS
            .iter()
            .any(|marker| current.join(marker).exists())
        {
            return Some(current);
        }
        if !current.pop() {
            break;
        }
    }
    None
}

/// Walk upward from `start` looking for a `specs/` subdirectory.
pub fn find_specs_root(start: &Path, max_levels: usize) -> Option<PathBuf> {
    let mut current = start.canonicalize().ok()?;
    for _ in 0..max_levels {
        if current.join(SPECS_DIR_NAME).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            break;
        }
    }
    None
}

/// Find the repository root: probe first, then the VCS-marker walk, then
/// the `specs/` walk. First success wins.
pub fn find_repository_root(start: &Path, probe: &dyn VcsProbe) -> Option<PathBuf> {
    if let Some(root) = probe.toplevel(start) {
        return Some(root);
    }
    if let Some(root) = find_vcs_root(start, MAX_SEARCH_LEVELS) {
        return Some(root);
    }
    find_specs_root(start, MAX_SEARCH_LEVELS)
}

/// Select the tasks file of the highest-numbered feature directory under
/// `root/specs`.
pub fn discover_latest_tasks_file(root: &Path) -> Result<PathBuf, DiscoveryError> {
    let specs_dir = root.join(SPECS_DIR_NAME);
    if !specs_dir.is_dir() {
        return Err(DiscoveryError::RootFoundNoProjectMarker {
            root: root.to_path_buf(),
        });
    }

    let entries = fs::read_dir(&specs_dir)
        .map_err(|err| DiscoveryError::Io(format!("listing {}: {}", specs_dir.display(), err)))?;

    let mut candidates: Vec<(u64, String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|err| DiscoveryError::Io(format!("listing {}: {}", specs_dir.display(), err)))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(caps) = FEATURE_DIR_RE.captures(&name) {
            if let Ok(number) = caps[1].parse::<u64>() {
                candidates.push((number, name, path));
            }
        }
    }

    // Tuple order compares ordinal first, then name: equal ordinals
    // resolve to the lexicographically greatest directory name.
    let Some((_, _, feature_dir)) = candidates.into_iter().max() else {
        return Err(DiscoveryError::NoFeatureDirectories { specs_dir });
    };

    let tasks_file = feature_dir.join(TASKS_FILE_NAME);
    if !tasks_file.is_file() {
        return Err(DiscoveryError::ProjectMarkerFoundNoFile { feature_dir });
    }
    Ok(tasks_file)
}

/// Full discovery chain: root detection followed by feature-directory
/// selection. This is what the CLI runs when no explicit path is given.
pub fn discover_tasks_file(start: &Path, probe: &dyn VcsProbe) -> Result<PathBuf, DiscoveryError> {
    let root = find_repository_root(start, probe).ok_or_else(|| DiscoveryError::NoRootDetected {
        start: start.to_path_buf(),
        levels: MAX_SEARCH_LEVELS,
    })?;
    discover_latest_tasks_file(&root)
}
