//! `regex_replace`: compile each replacement's regex once, then rewrite
//! every match in a file from the last one to the first so that earlier
//! spans' byte offsets are never invalidated by a later replacement.

use crate::core::{Pos, RenderError};
use crate::exec::{ExecState, render_paths};
use crate::fs_safety::walk_and_modify;
use crate::scope::Scope;
use crate::spec::model::{RegexReplacement, Spanned};
use crate::templating;
use std::sync::LazyLock;

static NUMBERED_BACKREF: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\$(\d+)").expect("valid regex"));

struct CompiledReplacement {
    pos: Pos,
    regex: regex::Regex,
    with: String,
    with_pos: Pos,
    subgroup_to_replace: Option<String>,
}

pub fn execute(
    state: &ExecState<'_>,
    paths: &[Spanned<String>],
    replacements: &[RegexReplacement],
    scope: &Scope,
) -> Result<(), RenderError> {
    let compiled: Vec<CompiledReplacement> = replacements
        .iter()
        .map(|r| compile_one(r, scope))
        .collect::<Result<_, _>>()?;
    let patterns = render_paths(paths, scope)?;

    walk_and_modify(&state.scratch_dir, &patterns, |_path, original| {
        let mut text = String::from_utf8_lossy(original).into_owned();
        for replacement in &compiled {
            text = apply_last_to_first(replacement, &text, scope)?;
        }
        Ok(text.into_bytes())
    })
}

fn compile_one(r: &RegexReplacement, scope: &Scope) -> Result<CompiledReplacement, RenderError> {
    if r.with.value.contains("{{") && NUMBERED_BACKREF.is_match(&r.with.value) {
        return Err(RenderError::Validation {
            pos: r.with.pos,
            message: "numbered backreferences ($1, $2, ...) cannot be mixed with template \
                      substitutions in the same 'with' string — use a named group (${name}) instead"
                .to_string(),
        });
    }

    let pattern = templating::parse_exec(r.regex.pos, &r.regex.value, scope)?;
    let regex = regex::Regex::new(&pattern).map_err(|e| RenderError::Validation {
        pos: r.regex.pos,
        message: format!("invalid regex '{pattern}': {e}"),
    })?;

    let subgroup_count = regex.captures_len() - 1;
    for caps in NUMBERED_BACKREF.captures_iter(&r.with.value) {
        let n: usize = caps[1].parse().unwrap_or(usize::MAX);
        if n == 0 || n > subgroup_count {
            return Err(RenderError::Validation {
                pos: r.with.pos,
                message: format!("backreference $${n} exceeds the regex's {subgroup_count} capture group(s)"),
            });
        }
    }

    let subgroup_to_replace = r
        .subgroup_to_replace
        .as_ref()
        .map(|s| templating::parse_exec(s.pos, &s.value, scope))
        .transpose()?;

    Ok(CompiledReplacement {
        pos: r.regex.pos,
        regex,
        with: r.with.value.clone(),
        with_pos: r.with.pos,
        subgroup_to_replace,
    })
}

/// For each match, first expand regex backreferences (`$1`, `${name}`) in
/// the raw `with` string against that match's captures, then render the
/// expanded string as a template against `scope`. Backreferences must
/// resolve before template interpolation so a `with` like
/// `"{{.${mysubgroup}}}"` becomes `"{{.foo}}"` per match before the
/// template engine ever sees it.
fn apply_last_to_first(replacement: &CompiledReplacement, text: &str, scope: &Scope) -> Result<String, RenderError> {
    let matches: Vec<regex::Captures<'_>> = replacement.regex.captures_iter(text).collect();
    let mut out = text.to_string();

    for caps in matches.into_iter().rev() {
        let (span_start, span_end) = match &replacement.subgroup_to_replace {
            Some(name) => {
                let m = caps.name(name).ok_or_else(|| RenderError::Validation {
                    pos: replacement.pos,
                    message: format!("regex has no capture group named '{name}'"),
                })?;
                (m.start(), m.end())
            }
            None => {
                let m = caps.get(0).expect("capture 0 always matches");
                (m.start(), m.end())
            }
        };
        let mut expanded = String::new();
        caps.expand(&replacement.with, &mut expanded);
        let rendered = templating::parse_exec(replacement.with_pos, &expanded, scope)?;
        out.replace_range(span_start..span_end, &rendered);
    }
    Ok(out)
}
