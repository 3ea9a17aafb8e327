//! Path sanitization and checked directory creation.

use crate::core::{Pos, RenderError};
use std::path::{Component, Path, PathBuf};

/// Reject `..` components and absolute paths, returning a clean relative
/// path. `p` is the raw (already rendered) path string taken from a spec
/// field — it has not yet been joined to any root.
///
/// # Errors
///
/// Returns [`RenderError::PathEscape`] if `p` contains a `..` component or
/// an absolute root/prefix.
pub fn safe_rel_path(p: &str) -> Result<PathBuf, RenderError> {
    let raw = Path::new(p);
    let mut out = PathBuf::new();
    for component in raw.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(RenderError::PathEscape {
                    path: p.to_string(),
                });
            }
        }
    }
    if out.as_os_str().is_empty() {
        return Err(RenderError::PathEscape {
            path: p.to_string(),
        });
    }
    Ok(out)
}

/// Create `path` and every missing ancestor, failing if a non-directory
/// already exists at `path` itself.
///
/// In `dry_run` mode this only checks for that conflict — no directory is
/// actually created, matching the pipeline's dry-run-then-real commit
/// protocol.
///
/// # Errors
///
/// Returns [`RenderError::DirFileConflict`] if a plain file already sits at
/// `path`, or [`RenderError::Io`] if directory creation fails.
pub fn mkdir_all_checked(path: &Path, dry_run: bool) -> Result<(), RenderError> {
    if path.exists() && !path.is_dir() {
        return Err(RenderError::DirFileConflict {
            path: path.display().to_string(),
        });
    }
    if dry_run {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|e| RenderError::io(path.display().to_string(), e))
}

/// `Pos`-carrying wrapper used when the offending path came from a
/// templated spec field and the caller wants the error to point back at
/// the YAML node that produced it.
pub fn safe_rel_path_at(pos: Pos, p: &str) -> Result<PathBuf, RenderError> {
    safe_rel_path(p).map_err(|e| match e {
        RenderError::PathEscape { path } => RenderError::MissingPath {
            pos,
            path: format!("{path} (escapes root)"),
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_parent_dir_traversal() {
        assert!(matches!(
            safe_rel_path("../etc/passwd"),
            Err(RenderError::PathEscape { .. })
        ));
    }

    #[test]
    fn rejects_absolute_path() {
        assert!(matches!(
            safe_rel_path("/etc/passwd"),
            Err(RenderError::PathEscape { .. })
        ));
    }

    #[test]
    fn strips_leading_current_dir() {
        let p = safe_rel_path("./src/main.rs").unwrap();
        assert_eq!(p, PathBuf::from("src/main.rs"));
    }

    #[test]
    fn never_resolves_outside_any_root() {
        let root = Path::new("/tmp/some/root");
        for candidate in ["a/b/c", "./x", "y.txt"] {
            let rel = safe_rel_path(candidate).unwrap();
            let joined = root.join(rel);
            assert!(joined.starts_with(root));
        }
    }
}
