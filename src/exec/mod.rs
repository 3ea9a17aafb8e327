//! The action executor: dispatches each step to its action implementation
//! and owns the cross-step state (scratch dir, destination dir for
//! `destination`-sourced includes, the `included_from_dest` set) those
//! implementations share.

pub mod actions;

use crate::cancel::CancellationToken;
use crate::core::RenderError;
use crate::expr;
use crate::scope::Scope;
use crate::spec::model::{Action, Step};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

/// Mutable state an execution run shares across every step. Not `Clone` —
/// there is exactly one of these per render.
pub struct ExecState<'a> {
    pub template_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub included_from_dest: RefCell<BTreeSet<PathBuf>>,
    pub stdout: RefCell<&'a mut dyn Write>,
    pub cancel: CancellationToken,
}

impl<'a> ExecState<'a> {
    pub fn new(
        template_dir: PathBuf,
        scratch_dir: PathBuf,
        dest_dir: PathBuf,
        stdout: &'a mut dyn Write,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            template_dir,
            scratch_dir,
            dest_dir,
            included_from_dest: RefCell::new(BTreeSet::new()),
            stdout: RefCell::new(stdout),
            cancel,
        }
    }
}

/// Execute a sequence of steps in document order against `scope`.
///
/// # Errors
///
/// Propagates the first error any step or nested `for_each` block raises.
pub fn execute_steps(state: &ExecState<'_>, steps: &[Step], scope: &Scope) -> Result<(), RenderError> {
    for step in steps {
        state.cancel.check()?;
        if let Some(guard) = &step.if_expr
            && !expr::eval_bool(guard.pos, &guard.value, scope)?
        {
            continue;
        }
        execute_one(state, step, scope)?;
    }
    Ok(())
}

fn execute_one(state: &ExecState<'_>, step: &Step, scope: &Scope) -> Result<(), RenderError> {
    match &step.action {
        Action::Print { message } => actions::print::execute(state, message, scope),
        Action::Include { groups } => actions::include::execute(state, groups, scope),
        Action::Append {
            paths,
            with,
            skip_ensure_newline,
        } => actions::append::execute(state, paths, with, *skip_ensure_newline, scope),
        Action::StringReplace { paths, replacements } => {
            actions::string_replace::execute(state, paths, replacements, scope)
        }
        Action::RegexReplace { paths, replacements } => {
            actions::regex_replace::execute(state, paths, replacements, scope)
        }
        Action::RegexNameLookup { paths, replacements } => {
            actions::regex_name_lookup::execute(state, paths, replacements, scope)
        }
        Action::GoTemplate { paths } => actions::go_template::execute(state, paths, scope),
        Action::ForEach { iterator, steps } => actions::for_each::execute(state, iterator, steps, scope),
    }
}

/// Render a list of templated path spans into `(Pos, String)` pairs ready
/// for [`crate::fs_safety::walk_and_modify`].
pub(crate) fn render_paths(
    paths: &[crate::spec::model::Spanned<String>],
    scope: &Scope,
) -> Result<Vec<(crate::core::Pos, String)>, RenderError> {
    paths
        .iter()
        .map(|p| Ok((p.pos, crate::templating::parse_exec(p.pos, &p.value, scope)?)))
        .collect()
}
