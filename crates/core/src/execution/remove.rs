//! Best-effort artifact removal
//!
//! Patterns are paths or globs relative to the workspace root. `*` and `?` do
//! not cross `/`; `**` does. Artifacts that do not exist are skipped and removal
//! errors are reported back instead of failing the task. Patterns that are
//! empty, absolute, or reach outside the root are refused.

use std::collections::VecDeque;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, warn};

/// What a removal pass did
#[derive(Debug, Default)]
pub struct RemovalOutcome {
    pub removed: Vec<PathBuf>,
    /// Patterns that matched nothing
    pub missing: Vec<String>,
    pub failed: Vec<(PathBuf, String)>,
}

fn has_glob_meta(component: &str) -> bool {
    component.contains(['*', '?', '[', '{'])
}

/// Directory to start walking from and how deep a pattern can reach below it
fn glob_base(pattern: &str) -> (PathBuf, Option<usize>) {
    let components: Vec<&str> = pattern.split('/').filter(|c| !c.is_empty()).collect();
    let literal: Vec<&str> = components
        .iter()
        .take_while(|c| !has_glob_meta(c))
        .copied()
        .collect();
    let depth = if pattern.contains("**") {
        None
    } else {
        Some(components.len() - literal.len())
    };
    (literal.iter().collect(), depth)
}

/// Normalise a removal pattern to `/`-separated components below the root.
///
/// `.` components are dropped. Empty, absolute and `..` patterns are refused,
/// as is anything that would name the root itself.
fn normalize_pattern(pattern: &str) -> Result<String, &'static str> {
    let trimmed = pattern.trim();
    let path = Path::new(trimmed);
    if path.has_root()
        || trimmed.starts_with(['/', '\\'])
        || path.components().any(|c| matches!(c, Component::Prefix(_)))
    {
        return Err("absolute paths are not allowed");
    }

    let mut components = Vec::new();
    for component in trimmed.split(['/', '\\']) {
        match component {
            "" | "." => continue,
            ".." => return Err("paths outside the workspace are not allowed"),
            other => components.push(other),
        }
    }

    if components.is_empty() {
        return Err("refusing to remove the workspace root");
    }
    Ok(components.join("/"))
}

fn remove_path(path: &Path) -> std::io::Result<()> {
    let metadata = std::fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

fn matching_paths(root: &Path, pattern: &str, matcher: &GlobMatcher) -> Vec<PathBuf> {
    let (base, max_depth) = glob_base(pattern);
    let mut matches = Vec::new();
    let mut queue = VecDeque::from([(root.join(base), 0usize)]);

    while let Some((dir, depth)) = queue.pop_front() {
        if max_depth.is_some_and(|max| depth >= max) {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if entry.file_name() == ".git" {
                continue;
            }
            let relative_path = path.strip_prefix(root).unwrap_or(&path);
            if matcher.is_match(relative_path) {
                matches.push(path);
            } else if entry.file_type().is_ok_and(|t| t.is_dir()) {
                queue.push_back((path, depth + 1));
            }
        }
    }

    matches.sort();
    matches
}

/// Remove every artifact matching `patterns` below `root`
pub fn remove_artifacts(root: &Path, patterns: &[String]) -> RemovalOutcome {
    let mut outcome = RemovalOutcome::default();

    for raw in patterns {
        let pattern = match normalize_pattern(raw) {
            Ok(pattern) => pattern,
            Err(reason) => {
                warn!(pattern = %raw, "skipping unsafe removal pattern: {}", reason);
                outcome
                    .failed
                    .push((PathBuf::from(raw), reason.to_string()));
                continue;
            }
        };
        let pattern = pattern.as_str();

        let targets = if has_glob_meta(pattern) {
            match GlobBuilder::new(pattern).literal_separator(true).build() {
                Ok(glob) => matching_paths(root, pattern, &glob.compile_matcher()),
                Err(e) => {
                    warn!(pattern = %pattern, error = %e, "skipping invalid removal pattern");
                    outcome
                        .failed
                        .push((PathBuf::from(pattern), format!("invalid pattern: {}", e)));
                    continue;
                }
            }
        } else {
            let path = root.join(pattern);
            if std::fs::symlink_metadata(&path).is_ok() {
                vec![path]
            } else {
                Vec::new()
            }
        };

        if targets.is_empty() {
            debug!(pattern = %pattern, "nothing to remove");
            outcome.missing.push(raw.clone());
            continue;
        }

        for target in targets {
            match remove_path(&target) {
                Ok(()) => {
                    debug!(path = %target.display(), "removed");
                    outcome.removed.push(target);
                }
                Err(e) => {
                    warn!(path = %target.display(), error = %e, "failed to remove");
                    outcome.failed.push((target, e.to_string()));
                }
            }
        }
    }

    outcome
}
