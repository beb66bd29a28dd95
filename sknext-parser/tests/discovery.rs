//! Integration tests for the discovery resolver.
//!
//! The VCS probe is stubbed so no test invokes a real external tool, and
//! root detection is asserted through the marker/specs walks directly so
//! the results do not depend on what happens to exist above the temp dir.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use sknext_parser::discovery::{
    discover_latest_tasks_file, discover_tasks_file, find_repository_root, find_specs_root,
    find_vcs_root, DiscoveryError, VcsProbe,
};

struct StubProbe(Option<PathBuf>);

impl VcsProbe for StubProbe {
    fn toplevel(&self, _dir: &Path) -> Option<PathBuf> {
        self.0.clone()
    }
}

fn make_feature(root: &Path, name: &str, with_tasks: bool) {
    let dir = root.join("specs").join(name);
    fs::create_dir_all(&dir).unwrap();
    if with_tasks {
        fs::write(dir.join("tasks.md"), "## Phase 1: X\n").unwrap();
    }
}

#[test]
fn vcs_marker_walk_finds_an_ancestor_directory_marker() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".git")).unwrap();
    let start = tmp.path().join("a/b/c");
    fs::create_dir_all(&start).unwrap();

    let root = find_vcs_root(&start, 10).unwrap();
    assert_eq!(root, tmp.path().canonicalize().unwrap());
}

#[test]
fn vcs_marker_may_be_a_file() {
    // Worktree layout: .git is a file, not a directory.
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".git"), "gitdir: elsewhere\n").unwrap();
    let start = tmp.path().join("sub");
    fs::create_dir_all(&start).unwrap();

    let root = find_vcs_root(&start, 10).unwrap();
    assert_eq!(root, tmp.path().canonicalize().unwrap());
}

#[test]
fn nested_markers_resolve_to_the_nearest_ancestor() {
    let tmp = TempDir::new().unwrap();
    let outer = tmp.path();
    let inner = outer.join("vendor/inner");
    fs::create_dir_all(outer.join(".git")).unwrap();
    fs::create_dir_all(inner.join(".git")).unwrap();
    let start = inner.join("src/deep");
    fs::create_dir_all(&start).unwrap();

    let root = find_vcs_root(&start, 10).unwrap();
    assert_eq!(root, inner.canonicalize().unwrap());
}

#[test]
fn walk_is_bounded_by_max_levels() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".hg")).unwrap();
    let start = tmp.path().join("a/b/c/d");
    fs::create_dir_all(&start).unwrap();

    // Marker is 4 levels up; a bound of 3 must not reach it.
    assert_eq!(find_vcs_root(&start, 3), None);
    assert!(find_vcs_root(&start, 5).is_some());
}

#[cfg(unix)]
#[test]
fn symlinked_start_walks_the_real_tree() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".git")).unwrap();
    let real = tmp.path().join("real/work");
    fs::create_dir_all(&real).unwrap();
    let link = tmp.path().join("link");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let root = find_vcs_root(&link, 10).unwrap();
    assert_eq!(root, tmp.path().canonicalize().unwrap());
}

#[test]
fn specs_walk_is_the_non_vcs_fallback() {
    let tmp = TempDir::new().unwrap();
    make_feature(tmp.path(), "007-feature", true);
    let start = tmp.path().join("a/b/c");
    fs::create_dir_all(&start).unwrap();

    let root = find_specs_root(&start, 10).unwrap();
    assert_eq!(root, tmp.path().canonicalize().unwrap());

    let tasks = discover_latest_tasks_file(&root).unwrap();
    assert!(tasks.is_absolute());
    assert!(tasks.ends_with("specs/007-feature/tasks.md"));
}

#[test]
fn probe_short_circuits_marker_and_specs_walks() {
    let tmp = TempDir::new().unwrap();
    make_feature(tmp.path(), "001-feature", true);

    let probe = StubProbe(Some(tmp.path().to_path_buf()));
    let root = find_repository_root(Path::new("/definitely/not/here"), &probe).unwrap();
    assert_eq!(root, tmp.path());

    let tasks = discover_tasks_file(Path::new("/definitely/not/here"), &probe).unwrap();
    assert!(tasks.ends_with("specs/001-feature/tasks.md"));
}

#[test]
fn highest_ordinal_directory_wins() {
    let tmp = TempDir::new().unwrap();
    make_feature(tmp.path(), "003-old", true);
    make_feature(tmp.path(), "042-new", true);

    let tasks = discover_latest_tasks_file(tmp.path()).unwrap();
    assert!(tasks.ends_with("specs/042-new/tasks.md"));
}

#[test]
fn ordinals_compare_numerically_not_lexicographically() {
    let tmp = TempDir::new().unwrap();
    make_feature(tmp.path(), "002-feature", true);
    make_feature(tmp.path(), "010-feature", true);
    make_feature(tmp.path(), "9-feature", true);

    let tasks = discover_latest_tasks_file(tmp.path()).unwrap();
    assert!(tasks.ends_with("specs/010-feature/tasks.md"));
}

#[test]
fn equal_ordinal_tiebreak_is_lexicographic() {
    let tmp = TempDir::new().unwrap();
    make_feature(tmp.path(), "007-alpha", true);
    make_feature(tmp.path(), "007-beta", true);

    // Deterministic: the lexicographically greatest name wins, every run.
    for _ in 0..3 {
        let tasks = discover_latest_tasks_file(tmp.path()).unwrap();
        assert!(tasks.ends_with("specs/007-beta/tasks.md"));
    }
}

#[test]
fn non_numbered_directories_are_ignored() {
    let tmp = TempDir::new().unwrap();
    make_feature(tmp.path(), "001-feature", true);
    make_feature(tmp.path(), "notes", true);
    make_feature(tmp.path(), "zzz-feature", true);

    let tasks = discover_latest_tasks_file(tmp.path()).unwrap();
    assert!(tasks.ends_with("specs/001-feature/tasks.md"));
}

#[test]
fn root_without_specs_is_a_distinct_error() {
    let tmp = TempDir::new().unwrap();
    let err = discover_latest_tasks_file(tmp.path()).unwrap_err();
    assert!(matches!(err, DiscoveryError::RootFoundNoProjectMarker { .. }));
}

#[test]
fn empty_specs_is_a_distinct_error() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("specs")).unwrap();
    let err = discover_latest_tasks_file(tmp.path()).unwrap_err();
    assert!(matches!(err, DiscoveryError::NoFeatureDirectories { .. }));
}

#[test]
fn feature_directory_without_tasks_file_is_a_distinct_error() {
    let tmp = TempDir::new().unwrap();
    make_feature(tmp.path(), "005-feature", false);
    let err = discover_latest_tasks_file(tmp.path()).unwrap_err();
    assert!(matches!(err, DiscoveryError::ProjectMarkerFoundNoFile { .. }));
}

#[test]
fn no_root_error_names_the_start_path_and_bound() {
    let probe = StubProbe(None);
    let err = discover_tasks_file(Path::new("/definitely/not/here"), &probe).unwrap_err();
    let DiscoveryError::NoRootDetected { start, levels } = &err else {
        panic!("expected NoRootDetected, got {err:?}");
    };
    assert_eq!(start, Path::new("/definitely/not/here"));
    assert_eq!(*levels, 10);
    assert!(err.to_string().contains("explicit tasks.md path"));
}
