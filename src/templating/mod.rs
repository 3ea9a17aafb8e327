//! The text-template engine adapter.
//!
//! Templated strings in a spec use a small Go-template-flavored syntax
//! (`{{.name}}` interpolation) layered on top of [`tera`]'s engine: a
//! preprocessing pass rewrites the leading-dot variable syntax into Tera's
//! native `{{ name }}` form, conditionals/loops are written with Tera's own
//! `{% if %}` / `{% for %}` tags, and a curated set of functions is
//! registered as Tera filters. Unlike Tera's own default (silently
//! rendering a missing variable as empty), a lookup miss here is promoted
//! to [`RenderError::UnknownVar`] — scaffolding generated from a typo'd
//! variable name should fail loudly, not ship a blank line.

mod case;
mod functions;

use crate::core::{Pos, RenderError};
use crate::scope::Scope;
use std::sync::LazyLock;
use tera::{Context as TeraContext, Tera};

static DOT_VAR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\{\{-?\s*\.([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex"));

static MISSING_VAR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"[Vv]ariable `([^`]+)` not found").expect("valid regex"));

/// Render `source` (a templated string from the spec) against `scope`.
///
/// # Errors
///
/// Returns [`RenderError::UnknownVar`] if the template references a scope
/// variable that isn't bound, or [`RenderError::Validation`] if the
/// template fails to parse.
pub fn parse_exec(pos: Pos, source: &str, scope: &Scope) -> Result<String, RenderError> {
    let rewritten = DOT_VAR.replace_all(source, "{{ $1").into_owned();
    let mut tera = engine();
    tera.add_raw_template("inline", &rewritten).map_err(|e| RenderError::Validation {
        pos,
        message: format!("template parse error: {e}"),
    })?;

    let vars = scope.all();
    let mut ctx = TeraContext::new();
    for (name, value) in &vars {
        ctx.insert(name, value);
    }

    tera.render("inline", &ctx).map_err(|e| to_render_error(pos, &e, &vars))
}

fn to_render_error(pos: Pos, err: &tera::Error, vars: &std::collections::BTreeMap<String, String>) -> RenderError {
    let message = err.to_string();
    let mut source = std::error::Error::source(err);
    let mut full_message = message.clone();
    while let Some(cause) = source {
        full_message = cause.to_string();
        if MISSING_VAR.is_match(&full_message) {
            break;
        }
        source = cause.source();
    }
    if let Some(caps) = MISSING_VAR.captures(&full_message) {
        let name = caps[1].to_string();
        return RenderError::UnknownVar {
            pos,
            name,
            available: vars.keys().cloned().collect(),
        };
    }
    RenderError::Validation {
        pos,
        message: format!("template render error: {message}"),
    }
}

fn engine() -> Tera {
    let mut tera = Tera::default();
    tera.register_filter("contains", functions::contains);
    tera.register_filter("replace", functions::replace);
    tera.register_filter("replaceAll", functions::replace_all);
    tera.register_filter("split", functions::split);
    tera.register_filter("toLower", functions::to_lower);
    tera.register_filter("toUpper", functions::to_upper);
    tera.register_filter("trimPrefix", functions::trim_prefix);
    tera.register_filter("trimSuffix", functions::trim_suffix);
    tera.register_filter("trimSpace", functions::trim_space);
    tera.register_filter("sortStrings", functions::sort_strings);
    tera.register_filter("toSnakeCase", functions::to_snake_case);
    tera.register_filter("toLowerSnakeCase", functions::to_lower_snake_case);
    tera.register_filter("toUpperSnakeCase", functions::to_upper_snake_case);
    tera.register_filter("toHyphenCase", functions::to_hyphen_case);
    tera.register_filter("toLowerHyphenCase", functions::to_lower_hyphen_case);
    tera.register_filter("toUpperHyphenCase", functions::to_upper_hyphen_case);
    tera
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope_with(pairs: &[(&str, &str)]) -> Scope {
        let mut vars = std::collections::BTreeMap::new();
        for (k, v) in pairs {
            vars.insert((*k).to_string(), (*v).to_string());
        }
        Scope::from_vars(vars)
    }

    #[test]
    fn interpolates_dotted_variable() {
        let scope = scope_with(&[("name", "World")]);
        let out = parse_exec(Pos::default(), "Hello, {{.name}}!", &scope).unwrap();
        assert_eq!(out, "Hello, World!");
    }

    #[test]
    fn missing_variable_is_an_error_with_available_names() {
        let scope = scope_with(&[("name", "World")]);
        let err = parse_exec(Pos::new(2, 3), "{{.nope}}", &scope).unwrap_err();
        match err {
            RenderError::UnknownVar { name, available, pos } => {
                assert_eq!(name, "nope");
                assert_eq!(available, vec!["name".to_string()]);
                assert_eq!(pos, Pos::new(2, 3));
            }
            other => panic!("expected UnknownVar, got {other:?}"),
        }
    }

    #[test]
    fn case_conversion_filter_applies() {
        let scope = Scope::root();
        let out = parse_exec(Pos::default(), "{{ \"My Cool App\" | toLowerSnakeCase }}", &scope).unwrap();
        assert_eq!(out, "my_cool_app");
    }
}
