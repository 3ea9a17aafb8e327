//! `include`: copy files from the template directory (or, for incremental
//! edits, the destination directory) into scratch, optionally renaming or
//! re-rooting them.

use crate::core::RenderError;
use crate::exec::ExecState;
use crate::fs_safety::copy::{CopyHint, CopyParams, copy_recursive};
use crate::fs_safety::paths::safe_rel_path_at;
use crate::scope::Scope;
use crate::spec::model::{IncludeFrom, IncludeGroup};
use crate::templating;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub fn execute(state: &ExecState<'_>, groups: &[IncludeGroup], scope: &Scope) -> Result<(), RenderError> {
    for group in groups {
        execute_group(state, group, scope)?;
    }
    Ok(())
}

fn execute_group(state: &ExecState<'_>, group: &IncludeGroup, scope: &Scope) -> Result<(), RenderError> {
    let source_root: &Path = match group.from {
        IncludeFrom::Template => &state.template_dir,
        IncludeFrom::Destination => &state.dest_dir,
    };

    let add_prefix = render_opt(group.add_prefix.as_ref(), scope)?;
    let strip_prefix = render_opt(group.strip_prefix.as_ref(), scope)?;
    let skip: BTreeSet<String> = group
        .skip
        .iter()
        .map(|s| templating::parse_exec(s.pos, &s.value, scope))
        .collect::<Result<_, _>>()?;

    for (i, path_spanned) in group.paths.iter().enumerate() {
        let rendered = templating::parse_exec(path_spanned.pos, &path_spanned.value, scope)?;
        let rel = safe_rel_path_at(path_spanned.pos, &rendered)?;

        if matches!(group.from, IncludeFrom::Template)
            && rel == Path::new(crate::constants::DEFAULT_SPEC_FILENAME)
        {
            continue;
        }
        if skip.contains(&rendered) {
            continue;
        }

        let dest_rel = dest_path_for(group, i, &rel, &strip_prefix, &add_prefix, path_spanned.pos, scope)?;
        let source_abs = source_root.join(&rel);
        let dest_abs = state.scratch_dir.join(&dest_rel);

        if !source_abs.exists() {
            return Err(RenderError::MissingPath {
                pos: path_spanned.pos,
                path: source_abs.display().to_string(),
            });
        }
        copy_into_scratch(&source_abs, &dest_abs)?;

        if matches!(group.from, IncludeFrom::Destination) {
            state.included_from_dest.borrow_mut().insert(dest_rel);
        }
    }
    Ok(())
}

fn render_opt(
    spanned: Option<&crate::spec::model::Spanned<String>>,
    scope: &Scope,
) -> Result<Option<String>, RenderError> {
    spanned.map(|s| templating::parse_exec(s.pos, &s.value, scope)).transpose()
}

fn dest_path_for(
    group: &IncludeGroup,
    index: usize,
    rel: &Path,
    strip_prefix: &Option<String>,
    add_prefix: &Option<String>,
    pos: crate::core::Pos,
    scope: &Scope,
) -> Result<PathBuf, RenderError> {
    if let Some(as_list) = &group.r#as {
        let as_spanned = &as_list[index];
        let rendered = templating::parse_exec(as_spanned.pos, &as_spanned.value, scope)?;
        return safe_rel_path_at(as_spanned.pos, &rendered);
    }

    let mut out = rel.to_path_buf();
    if let Some(prefix) = strip_prefix {
        out = out
            .strip_prefix(Path::new(prefix))
            .map_err(|_| RenderError::Validation {
                pos,
                message: format!(
                    "path '{}' does not start with strip_prefix '{prefix}'",
                    rel.display()
                ),
            })?
            .to_path_buf();
    }
    if let Some(prefix) = add_prefix {
        out = Path::new(prefix).join(out);
    }
    Ok(out)
}

/// Copy a single file, or a whole directory tree, overwriting anything
/// already at the destination — later include groups are allowed to
/// replace files an earlier group placed in scratch.
fn copy_into_scratch(source_abs: &Path, dest_abs: &Path) -> Result<(), RenderError> {
    if source_abs.is_dir() {
        if let Some(parent) = dest_abs.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RenderError::io(parent.display().to_string(), e))?;
        }
        std::fs::create_dir_all(dest_abs).map_err(|e| RenderError::io(dest_abs.display().to_string(), e))?;
        let params = CopyParams {
            src_root: source_abs,
            dest_root: dest_abs,
            backup_root: dest_abs,
            dry_run: false,
        };
        copy_recursive(&params, |_rel, _is_dir| CopyHint {
            overwrite: true,
            backup_if_exists: false,
            skip: false,
        })
    } else {
        if let Some(parent) = dest_abs.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RenderError::io(parent.display().to_string(), e))?;
        }
        std::fs::copy(source_abs, dest_abs).map_err(|e| RenderError::io(dest_abs.display().to_string(), e))?;
        Ok(())
    }
}
