//! `regex_name_lookup`: every capture group in the regex must be named;
//! each match has every one of its named subgroups replaced by the scope
//! variable of the same name.

use crate::core::{Pos, RenderError};
use crate::exec::{ExecState, render_paths};
use crate::fs_safety::walk_and_modify;
use crate::scope::Scope;
use crate::spec::model::{RegexLookup, Spanned};
use crate::templating;

struct CompiledLookup {
    pos: Pos,
    regex: regex::Regex,
    group_names: Vec<String>,
}

pub fn execute(
    state: &ExecState<'_>,
    paths: &[Spanned<String>],
    replacements: &[RegexLookup],
    scope: &Scope,
) -> Result<(), RenderError> {
    let compiled: Vec<CompiledLookup> = replacements
        .iter()
        .map(|r| compile_one(r, scope))
        .collect::<Result<_, _>>()?;
    let patterns = render_paths(paths, scope)?;
    let bindings = scope.all();

    walk_and_modify(&state.scratch_dir, &patterns, |_path, original| {
        let mut text = String::from_utf8_lossy(original).into_owned();
        for lookup in &compiled {
            text = apply_last_to_first(lookup, &text, &bindings)?;
        }
        Ok(text.into_bytes())
    })
}

fn compile_one(r: &RegexLookup, scope: &Scope) -> Result<CompiledLookup, RenderError> {
    let pattern = templating::parse_exec(r.regex.pos, &r.regex.value, scope)?;
    let regex = regex::Regex::new(&pattern).map_err(|e| RenderError::Validation {
        pos: r.regex.pos,
        message: format!("invalid regex '{pattern}': {e}"),
    })?;

    let group_names: Vec<String> = regex.capture_names().flatten().map(str::to_string).collect();
    if group_names.len() + 1 != regex.captures_len() {
        return Err(RenderError::Validation {
            pos: r.regex.pos,
            message: "every capture group in a regex_name_lookup pattern must be named".to_string(),
        });
    }

    Ok(CompiledLookup {
        pos: r.regex.pos,
        regex,
        group_names,
    })
}

fn apply_last_to_first(
    lookup: &CompiledLookup,
    text: &str,
    bindings: &std::collections::BTreeMap<String, String>,
) -> Result<String, RenderError> {
    let matches: Vec<regex::Captures<'_>> = lookup.regex.captures_iter(text).collect();
    let mut out = text.to_string();

    for caps in matches.into_iter().rev() {
        let mut spans: Vec<(usize, usize, &str)> = Vec::new();
        for name in &lookup.group_names {
            if let Some(m) = caps.name(name) {
                let value = bindings.get(name).ok_or_else(|| RenderError::UnknownVar {
                    pos: lookup.pos,
                    name: name.clone(),
                    available: bindings.keys().cloned().collect(),
                })?;
                spans.push((m.start(), m.end(), value.as_str()));
            }
        }
        spans.sort_by(|a, b| b.0.cmp(&a.0));
        for (start, end, value) in spans {
            out.replace_range(start..end, value);
        }
    }
    Ok(out)
}
