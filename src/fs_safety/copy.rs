//! Recursive directory copy with per-file overwrite/backup policy.
//!
//! Used both by `include` (copying template/destination files into scratch)
//! and by the pipeline driver's final scratch-to-destination commit. The
//! two-phase (`dry_run` then real) protocol lets the driver detect every
//! conflict before writing a single byte.

use crate::core::RenderError;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Per-file policy decided by the caller before a file is written.
#[derive(Debug, Clone, Copy)]
pub struct CopyHint {
    /// Allowed to replace an existing destination file.
    pub overwrite: bool,
    /// If the destination file already exists and is about to be replaced,
    /// copy its current bytes into the backup directory first.
    pub backup_if_exists: bool,
    /// Skip this entry entirely. If it names a directory, its whole
    /// subtree is pruned.
    pub skip: bool,
}

pub struct CopyParams<'a> {
    pub src_root: &'a Path,
    pub dest_root: &'a Path,
    pub backup_root: &'a Path,
    pub dry_run: bool,
}

/// Walk `src_root` and copy every file into the matching path under
/// `dest_root`, asking `hint_for` for each entry's policy.
///
/// `hint_for` receives the path relative to `src_root` and whether an
/// entry is a directory.
///
/// # Errors
///
/// - [`RenderError::DirFileConflict`] if the destination already has a
///   directory where a file needs to be written (or vice versa).
/// - [`RenderError::OverwriteRefused`] if a destination file exists and the
///   hint disallows overwriting it.
/// - [`RenderError::Io`] on any read/write/copy failure.
pub fn copy_recursive(
    params: &CopyParams<'_>,
    mut hint_for: impl FnMut(&Path, bool) -> CopyHint,
) -> Result<(), RenderError> {
    let mut backup_dir_created = false;
    copy_dir_inner(params, params.src_root, &mut hint_for, &mut backup_dir_created)
}

fn copy_dir_inner(
    params: &CopyParams<'_>,
    dir: &Path,
    hint_for: &mut impl FnMut(&Path, bool) -> CopyHint,
    backup_dir_created: &mut bool,
) -> Result<(), RenderError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| RenderError::io(dir.display().to_string(), e))?
        .collect::<Result<_, _>>()
        .map_err(|e| RenderError::io(dir.display().to_string(), e))?;
    entries.sort_by_key(std::fs::DirEntry::path);

    for entry in entries {
        let src_path = entry.path();
        let rel = src_path
            .strip_prefix(params.src_root)
            .expect("walked path is under src_root")
            .to_path_buf();
        let is_dir = src_path.is_dir();
        let hint = hint_for(&rel, is_dir);

        if hint.skip {
            continue;
        }

        if is_dir {
            let dest_dir = params.dest_root.join(&rel);
            if dest_dir.exists() && dest_dir.is_file() {
                return Err(RenderError::DirFileConflict {
                    path: dest_dir.display().to_string(),
                });
            }
            if !params.dry_run {
                std::fs::create_dir_all(&dest_dir)
                    .map_err(|e| RenderError::io(dest_dir.display().to_string(), e))?;
            }
            copy_dir_inner(params, &src_path, hint_for, backup_dir_created)?;
            continue;
        }

        copy_one_file(params, &src_path, &rel, hint, backup_dir_created)?;
    }
    Ok(())
}

fn copy_one_file(
    params: &CopyParams<'_>,
    src_path: &Path,
    rel: &Path,
    hint: CopyHint,
    backup_dir_created: &mut bool,
) -> Result<(), RenderError> {
    let dest_path = params.dest_root.join(rel);

    if dest_path.is_dir() {
        return Err(RenderError::DirFileConflict {
            path: dest_path.display().to_string(),
        });
    }
    let dest_exists = dest_path.is_file();
    if dest_exists && !hint.overwrite {
        return Err(RenderError::OverwriteRefused {
            path: dest_path.display().to_string(),
        });
    }

    if params.dry_run {
        return Ok(());
    }

    if dest_exists && hint.backup_if_exists {
        if !*backup_dir_created {
            std::fs::create_dir_all(params.backup_root)
                .map_err(|e| RenderError::io(params.backup_root.display().to_string(), e))?;
            *backup_dir_created = true;
        }
        let backup_path = params.backup_root.join(rel);
        if let Some(parent) = backup_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RenderError::io(parent.display().to_string(), e))?;
        }
        std::fs::copy(&dest_path, &backup_path).map_err(|e| RenderError::io(backup_path.display().to_string(), e))?;
    }

    if let Some(parent) = dest_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| RenderError::io(parent.display().to_string(), e))?;
    }
    std::fs::copy(src_path, &dest_path).map_err(|e| RenderError::io(dest_path.display().to_string(), e))?;
    preserve_permissions(src_path, &dest_path)?;
    Ok(())
}

#[cfg(unix)]
fn preserve_permissions(src: &Path, dest: &Path) -> Result<(), RenderError> {
    let mode = std::fs::metadata(src)
        .map_err(|e| RenderError::io(src.display().to_string(), e))?
        .permissions()
        .mode();
    std::fs::set_permissions(dest, std::fs::Permissions::from_mode(mode))
        .map_err(|e| RenderError::io(dest.display().to_string(), e))
}

#[cfg(not(unix))]
fn preserve_permissions(_src: &Path, _dest: &Path) -> Result<(), RenderError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn refuses_overwrite_by_default() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let backup = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.txt"), b"new").unwrap();
        fs::write(dest.path().join("a.txt"), b"old").unwrap();

        let params = CopyParams {
            src_root: src.path(),
            dest_root: dest.path(),
            backup_root: backup.path(),
            dry_run: false,
        };
        let err = copy_recursive(&params, |_rel, _is_dir| CopyHint {
            overwrite: false,
            backup_if_exists: false,
            skip: false,
        })
        .unwrap_err();
        assert!(matches!(err, RenderError::OverwriteRefused { .. }));
        assert_eq!(fs::read(dest.path().join("a.txt")).unwrap(), b"old");
    }

    #[test]
    fn backs_up_overwritten_file() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let backup = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.txt"), b"new").unwrap();
        fs::write(dest.path().join("a.txt"), b"old").unwrap();

        let params = CopyParams {
            src_root: src.path(),
            dest_root: dest.path(),
            backup_root: backup.path(),
            dry_run: false,
        };
        copy_recursive(&params, |_rel, _is_dir| CopyHint {
            overwrite: true,
            backup_if_exists: true,
            skip: false,
        })
        .unwrap();
        assert_eq!(fs::read(dest.path().join("a.txt")).unwrap(), b"new");
        assert_eq!(fs::read(backup.path().join("a.txt")).unwrap(), b"old");
    }

    #[test]
    fn dry_run_writes_nothing() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let backup = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.txt"), b"new").unwrap();

        let params = CopyParams {
            src_root: src.path(),
            dest_root: dest.path(),
            backup_root: backup.path(),
            dry_run: true,
        };
        copy_recursive(&params, |_rel, _is_dir| CopyHint {
            overwrite: true,
            backup_if_exists: true,
            skip: false,
        })
        .unwrap();
        assert!(!dest.path().join("a.txt").exists());
    }
}
