//! Cross-field structural validation, run as a separate pass after
//! decoding succeeds.
//!
//! Decoding only checks that a node has the right shape (right fields,
//! right primitive types); this pass checks the rules that span multiple
//! fields or that need knowledge the decoder doesn't have (the set of
//! `api_version`s this build understands, a subgroup name's syntax, …).

use crate::constants::{SPEC_KIND, SUPPORTED_API_VERSIONS};
use crate::core::RenderError;
use crate::spec::model::{Action, ForEachIterator, IncludeGroup, InputDecl, Spec, Step};
use std::sync::LazyLock;

static SUBGROUP_NAME: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new("^[A-Za-z][A-Za-z0-9]*$").expect("valid regex"));

impl Spec {
    /// Run every structural rule, returning the first violation.
    ///
    /// Internally every rule is checked (so the first reported error is
    /// deterministic regardless of decode order), but only the first is
    /// surfaced — a spec with one mistake rarely benefits from seeing the
    /// rest before fixing it.
    pub fn validate(&self) -> Result<(), RenderError> {
        let errors = self.collect_errors();
        errors.into_iter().next().map_or(Ok(()), Err)
    }

    fn collect_errors(&self) -> Vec<RenderError> {
        let mut errors = Vec::new();

        if self.kind.value != SPEC_KIND {
            errors.push(RenderError::Validation {
                pos: self.kind.pos,
                message: format!("kind must be '{SPEC_KIND}', found '{}'", self.kind.value),
            });
        }
        if !SUPPORTED_API_VERSIONS.contains(&self.api_version.value.as_str()) {
            errors.push(RenderError::Validation {
                pos: self.api_version.pos,
                message: format!(
                    "unsupported api_version '{}' (supported: {})",
                    self.api_version.value,
                    SUPPORTED_API_VERSIONS.join(", ")
                ),
            });
        }
        for input in &self.inputs {
            validate_input(input, &mut errors);
        }
        for step in &self.steps {
            validate_step(step, &mut errors);
        }
        errors
    }
}

fn validate_input(input: &InputDecl, errors: &mut Vec<RenderError>) {
    if input.name.value.is_empty() {
        errors.push(RenderError::Validation {
            pos: input.name.pos,
            message: "input name must not be empty".to_string(),
        });
    } else if input.name.value.starts_with('_') {
        errors.push(RenderError::Validation {
            pos: input.name.pos,
            message: format!(
                "input name '{}' starts with '_', which is reserved for builtins",
                input.name.value
            ),
        });
    }
}

fn validate_step(step: &Step, errors: &mut Vec<RenderError>) {
    match &step.action {
        Action::Include { groups } => {
            for group in groups {
                validate_include_group(group, errors);
            }
        }
        Action::RegexReplace { replacements, .. } => {
            for r in replacements {
                if let Some(subgroup) = &r.subgroup_to_replace
                    && !SUBGROUP_NAME.is_match(&subgroup.value)
                {
                    errors.push(RenderError::Validation {
                        pos: subgroup.pos,
                        message: format!(
                            "subgroup_to_replace '{}' is not a valid capture group name",
                            subgroup.value
                        ),
                    });
                }
            }
        }
        Action::ForEach { iterator, steps } => {
            validate_iterator(iterator, errors);
            for nested in steps {
                validate_step(nested, errors);
            }
        }
        Action::Print { .. }
        | Action::Append { .. }
        | Action::StringReplace { .. }
        | Action::RegexNameLookup { .. }
        | Action::GoTemplate { .. } => {}
    }
}

fn validate_include_group(group: &IncludeGroup, errors: &mut Vec<RenderError>) {
    if let Some(r#as) = &group.r#as
        && r#as.len() != group.paths.len()
    {
        errors.push(RenderError::Validation {
            pos: group.pos,
            message: format!(
                "'as' must have one entry per path ({} paths, {} entries in 'as')",
                group.paths.len(),
                r#as.len()
            ),
        });
    }
}

fn validate_iterator(iterator: &ForEachIterator, errors: &mut Vec<RenderError>) {
    match (&iterator.values, &iterator.values_from) {
        (Some(_), Some(_)) => errors.push(RenderError::Validation {
            pos: iterator.pos,
            message: "for_each iterator must set only one of 'values' or 'values_from'".to_string(),
        }),
        (None, None) => errors.push(RenderError::Validation {
            pos: iterator.pos,
            message: "for_each iterator must set one of 'values' or 'values_from'".to_string(),
        }),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::model::Spanned;
    use crate::core::Pos;

    fn spanned(s: &str) -> Spanned<String> {
        Spanned::new(s.to_string(), Pos::new(1, 1))
    }

    #[test]
    fn rejects_wrong_kind() {
        let spec = Spec {
            pos: Pos::default(),
            api_version: spanned("render/v1"),
            kind: spanned("NotATemplate"),
            desc: None,
            inputs: Vec::new(),
            steps: vec![Step {
                pos: Pos::default(),
                desc: None,
                if_expr: None,
                action: Action::Print { message: spanned("hi") },
            }],
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn rejects_underscore_prefixed_input_name() {
        let input = InputDecl {
            pos: Pos::default(),
            name: spanned("_reserved"),
            desc: None,
            default: None,
            rules: Vec::new(),
        };
        let mut errors = Vec::new();
        validate_input(&input, &mut errors);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn for_each_requires_exactly_one_source() {
        let both = ForEachIterator {
            pos: Pos::default(),
            key: spanned("x"),
            values: Some(vec![spanned("a")]),
            values_from: Some(spanned("expr")),
        };
        let mut errors = Vec::new();
        validate_iterator(&both, &mut errors);
        assert_eq!(errors.len(), 1);

        let neither = ForEachIterator {
            pos: Pos::default(),
            key: spanned("x"),
            values: None,
            values_from: None,
        };
        let mut errors = Vec::new();
        validate_iterator(&neither, &mut errors);
        assert_eq!(errors.len(), 1);
    }
}
