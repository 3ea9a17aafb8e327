//! The expression engine adapter.
//!
//! A thin wrapper over [`cel_interpreter`], used for input validation
//! rules, step `if` guards, and `for_each` iterator `values_from`
//! expressions. Every call compiles its source once and evaluates it
//! immediately — the spec's data model doesn't carry compiled expressions
//! between steps, so there's no cache to keep coherent.

mod functions;

use crate::core::{Pos, RenderError};
use crate::scope::Scope;
use cel_interpreter::{Context, Program, Value};

fn build_context(scope: &Scope) -> Context<'static> {
    let mut context = Context::default();
    functions::register(&mut context);
    for (name, value) in scope.all() {
        // Every scope binding is already a string; CEL's own literals
        // (ints, lists, maps) only ever appear inside expression source
        // text, not as bindings.
        let _ = context.add_variable(name.as_str(), value);
    }
    context
}

fn compile(pos: Pos, source: &str) -> Result<Program, RenderError> {
    Program::compile(source).map_err(|e| RenderError::Expr {
        pos,
        message: e.to_string(),
    })
}

fn execute(pos: Pos, program: &Program, scope: &Scope) -> Result<Value, RenderError> {
    let context = build_context(scope);
    program.execute(&context).map_err(|e| RenderError::Expr {
        pos,
        message: e.to_string(),
    })
}

/// Compile and evaluate `source`, requiring the result to be a boolean.
/// Used for step `if` guards and input validation rules.
///
/// # Errors
///
/// Returns [`RenderError::Expr`] on a compile/evaluate failure, or
/// [`RenderError::ExprConversion`] if the result isn't a `bool`.
pub fn eval_bool(pos: Pos, source: &str, scope: &Scope) -> Result<bool, RenderError> {
    let program = compile(pos, source)?;
    match execute(pos, &program, scope)? {
        Value::Bool(b) => Ok(b),
        other => Err(RenderError::ExprConversion {
            pos,
            target_type: "bool",
            engine_message: format!("expression evaluated to {other:?}, not a bool"),
        }),
    }
}

/// Compile and evaluate `source`, requiring the result to be a list of
/// strings. Used for `for_each` iterator `values_from`.
///
/// # Errors
///
/// Returns [`RenderError::Expr`] on a compile/evaluate failure, or
/// [`RenderError::ExprConversion`] if the result isn't a list of strings.
pub fn eval_string_list(pos: Pos, source: &str, scope: &Scope) -> Result<Vec<String>, RenderError> {
    let program = compile(pos, source)?;
    match execute(pos, &program, scope)? {
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.as_ref().clone()),
                other => Err(RenderError::ExprConversion {
                    pos,
                    target_type: "list<string>",
                    engine_message: format!("list element {other:?} is not a string"),
                }),
            })
            .collect(),
        other => Err(RenderError::ExprConversion {
            pos,
            target_type: "list<string>",
            engine_message: format!("expression evaluated to {other:?}, not a list"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn scope_with(pairs: &[(&str, &str)]) -> Scope {
        let mut vars = BTreeMap::new();
        for (k, v) in pairs {
            vars.insert((*k).to_string(), (*v).to_string());
        }
        Scope::from_vars(vars)
    }

    #[test]
    fn evaluates_simple_boolean() {
        let scope = scope_with(&[("name", "foo")]);
        assert!(eval_bool(Pos::default(), "name == \"foo\"", &scope).unwrap());
    }

    #[test]
    fn non_bool_result_is_a_conversion_error() {
        let scope = Scope::root();
        let err = eval_bool(Pos::default(), "\"not a bool\"", &scope).unwrap_err();
        assert!(matches!(err, RenderError::ExprConversion { .. }));
    }

    #[test]
    fn evaluates_string_list() {
        let scope = Scope::root();
        let out = eval_string_list(Pos::default(), "[\"a\", \"b\", \"c\"]", &scope).unwrap();
        assert_eq!(out, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    }
}
