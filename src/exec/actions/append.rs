//! `append`: render a snippet once and append it to every matched file,
//! inserting a newline between the two only when neither side already has
//! one.

use crate::core::RenderError;
use crate::exec::{ExecState, render_paths};
use crate::fs_safety::walk_and_modify;
use crate::scope::Scope;
use crate::spec::model::Spanned;
use crate::templating;

pub fn execute(
    state: &ExecState<'_>,
    paths: &[Spanned<String>],
    with: &Spanned<String>,
    skip_ensure_newline: bool,
    scope: &Scope,
) -> Result<(), RenderError> {
    let rendered_with = templating::parse_exec(with.pos, &with.value, scope)?;
    let patterns = render_paths(paths, scope)?;

    walk_and_modify(&state.scratch_dir, &patterns, |_path, original| {
        let mut out = original.to_vec();
        let needs_newline = !skip_ensure_newline
            && !matches!(out.last(), Some(b'\n'))
            && !rendered_with.as_bytes().first().is_some_and(|b| *b == b'\n');
        if needs_newline {
            out.push(b'\n');
        }
        out.extend_from_slice(rendered_with.as_bytes());
        Ok(out)
    })
}
