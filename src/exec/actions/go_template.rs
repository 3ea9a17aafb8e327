//! `go_template`: run a file's entire contents through the text-template
//! engine, in place.

use crate::core::RenderError;
use crate::exec::{ExecState, render_paths};
use crate::fs_safety::walk_and_modify;
use crate::scope::Scope;
use crate::spec::model::Spanned;
use crate::templating;

pub fn execute(state: &ExecState<'_>, paths: &[Spanned<String>], scope: &Scope) -> Result<(), RenderError> {
    let patterns = render_paths(paths, scope)?;
    let pos = patterns.first().map_or(crate::core::Pos::default(), |(pos, _)| *pos);
    walk_and_modify(&state.scratch_dir, &patterns, |path, original| {
        let source = String::from_utf8_lossy(original);
        let rendered = templating::parse_exec(pos, &source, scope).map_err(|e| {
            if let RenderError::UnknownVar { name, available, .. } = e {
                RenderError::UnknownVar {
                    pos,
                    name: format!("{name} (in {})", path.display()),
                    available,
                }
            } else {
                e
            }
        })?;
        Ok(rendered.into_bytes())
    })
}
