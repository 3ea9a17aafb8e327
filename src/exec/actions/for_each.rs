//! `for_each`: bind each element of `values` (rendered strings) or
//! `values_from` (an expression evaluating to a list of strings) to the
//! iterator's key, running the nested steps once per element in a pushed
//! scope frame.

use crate::core::RenderError;
use crate::exec::{ExecState, execute_steps};
use crate::expr;
use crate::scope::Scope;
use crate::spec::model::{ForEachIterator, Step};
use crate::templating;

pub fn execute(
    state: &ExecState<'_>,
    iterator: &ForEachIterator,
    steps: &[Step],
    scope: &Scope,
) -> Result<(), RenderError> {
    let elements = resolve_elements(iterator, scope)?;
    for element in elements {
        let inner = scope.push_one(iterator.key.value.clone(), element);
        execute_steps(state, steps, &inner)?;
    }
    Ok(())
}

fn resolve_elements(iterator: &ForEachIterator, scope: &Scope) -> Result<Vec<String>, RenderError> {
    if let Some(values) = &iterator.values {
        return values
            .iter()
            .map(|v| templating::parse_exec(v.pos, &v.value, scope))
            .collect();
    }
    if let Some(values_from) = &iterator.values_from {
        return expr::eval_string_list(values_from.pos, &values_from.value, scope);
    }
    // Structural validation guarantees exactly one of the two is set.
    unreachable!("for_each iterator with neither values nor values_from passed validation")
}
