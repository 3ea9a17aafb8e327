//! Expand glob patterns under a root directory and run a visitor over each
//! matched file exactly once.
//!
//! This is the shared machinery behind `append`, `string_replace`,
//! `regex_replace`, `regex_name_lookup`, and `go_template` — they all
//! resolve a list of templated path patterns to a deduplicated set of real
//! files and then rewrite each file's bytes in place.

use crate::core::{Pos, RenderError};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Resolve `patterns` (already-rendered path/glob strings, one per spec
/// entry) against `root`, then invoke `visitor` on each matched file's
/// bytes exactly once, writing the result back if it changed.
///
/// # Errors
///
/// - [`RenderError::PathEscape`] if a pattern contains a backslash (only
///   forward-slash separators are accepted in glob patterns) or a `..`
///   component.
/// - [`RenderError::GlobNoMatch`] if a pattern matches no files.
/// - [`RenderError::Io`] on any read/write failure.
/// - whatever `visitor` returns, unchanged.
pub fn walk_and_modify(
    root: &Path,
    patterns: &[(Pos, String)],
    mut visitor: impl FnMut(&Path, &[u8]) -> Result<Vec<u8>, RenderError>,
) -> Result<(), RenderError> {
    let mut seen = BTreeSet::new();
    let mut ordered = Vec::new();

    for (pos, pattern) in patterns {
        if pattern.contains('\\') {
            return Err(RenderError::PathEscape {
                path: pattern.clone(),
            });
        }
        let mut matches = resolve_pattern(root, pattern, *pos)?;
        matches.sort();
        if matches.is_empty() {
            return Err(RenderError::GlobNoMatch {
                pos: *pos,
                pattern: pattern.clone(),
            });
        }
        for abs in matches {
            let canon = abs.canonicalize().unwrap_or(abs.clone());
            if seen.insert(canon) {
                ordered.push(abs);
            }
        }
    }

    for abs in ordered {
        let original = std::fs::read(&abs).map_err(|e| RenderError::io(abs.display().to_string(), e))?;
        let updated = visitor(&abs, &original)?;
        if updated != original {
            std::fs::write(&abs, &updated).map_err(|e| RenderError::io(abs.display().to_string(), e))?;
            set_walk_modify_mode(&abs)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn set_walk_modify_mode(path: &Path) -> Result<(), RenderError> {
    // Only takes effect for files the visitor itself created, since the OS
    // leaves an existing file's permission bits untouched on a plain write.
    let perms = std::fs::Permissions::from_mode(crate::constants::WALK_MODIFY_FILE_MODE);
    std::fs::set_permissions(path, perms).map_err(|e| RenderError::io(path.display().to_string(), e))
}

#[cfg(not(unix))]
fn set_walk_modify_mode(_path: &Path) -> Result<(), RenderError> {
    Ok(())
}

/// Resolve one pattern to the set of absolute paths it names.
///
/// `"."` means every file anywhere under `root`. A pattern containing no
/// glob metacharacters is otherwise treated as a literal path (and must
/// exist); anything else is expanded with `glob`.
fn resolve_pattern(root: &Path, pattern: &str, pos: Pos) -> Result<Vec<PathBuf>, RenderError> {
    if pattern == "." {
        return Ok(walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect());
    }

    let rel = crate::fs_safety::paths::safe_rel_path_at(pos, pattern)?;
    if !is_glob(pattern) {
        let abs = root.join(&rel);
        return if abs.is_file() {
            Ok(vec![abs])
        } else {
            Ok(Vec::new())
        };
    }

    let abs_pattern = root.join(&rel);
    let pattern_str = abs_pattern.to_string_lossy().into_owned();
    let mut out = Vec::new();
    let entries = glob::glob(&pattern_str).map_err(|e| RenderError::Validation {
        pos,
        message: format!("invalid glob pattern '{pattern}': {e}"),
    })?;
    for entry in entries {
        let path = entry.map_err(|e| RenderError::io(e.path().display().to_string(), e.into()))?;
        if path.is_file() {
            out.push(path);
        }
    }
    Ok(out)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn visits_each_matched_file_once_even_with_overlap() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        let mut count = 0;
        walk_and_modify(
            dir.path(),
            &[
                (Pos::default(), "*.txt".to_string()),
                (Pos::default(), "a.txt".to_string()),
            ],
            |_path, bytes| {
                count += 1;
                Ok(bytes.to_vec())
            },
        )
        .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn no_match_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = walk_and_modify(dir.path(), &[(Pos::default(), "*.missing".to_string())], |_, b| {
            Ok(b.to_vec())
        })
        .unwrap_err();
        assert!(matches!(err, RenderError::GlobNoMatch { .. }));
    }
}
