//! `print`: render a message and write it to the render's stdout sink.

use crate::core::RenderError;
use crate::exec::ExecState;
use crate::scope::Scope;
use crate::spec::model::Spanned;
use crate::templating;

pub fn execute(state: &ExecState<'_>, message: &Spanned<String>, scope: &Scope) -> Result<(), RenderError> {
    let mut rendered = templating::parse_exec(message.pos, &message.value, scope)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    state
        .stdout
        .borrow_mut()
        .write_all(rendered.as_bytes())
        .map_err(|e| RenderError::io("<stdout>", e))
}
