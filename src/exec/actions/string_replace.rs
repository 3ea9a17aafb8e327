//! `string_replace`: literal substring replacement. All pairs are applied
//! in a single left-to-right pass so that one replacement's output is
//! never itself rescanned for another pair's `to_replace`.

use crate::core::RenderError;
use crate::exec::{ExecState, render_paths};
use crate::fs_safety::walk_and_modify;
use crate::scope::Scope;
use crate::spec::model::{Spanned, StringReplacement};
use crate::templating;

pub fn execute(
    state: &ExecState<'_>,
    paths: &[Spanned<String>],
    replacements: &[StringReplacement],
    scope: &Scope,
) -> Result<(), RenderError> {
    let pairs: Vec<(String, String)> = replacements
        .iter()
        .map(|r| {
            Ok((
                templating::parse_exec(r.to_replace.pos, &r.to_replace.value, scope)?,
                templating::parse_exec(r.with.pos, &r.with.value, scope)?,
            ))
        })
        .collect::<Result<_, RenderError>>()?;
    let patterns = render_paths(paths, scope)?;

    walk_and_modify(&state.scratch_dir, &patterns, |_path, original| {
        let text = String::from_utf8_lossy(original);
        Ok(simultaneous_replace(&text, &pairs).into_bytes())
    })
}

fn simultaneous_replace(input: &str, pairs: &[(String, String)]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    let bytes_len = input.len();
    'outer: while i < bytes_len {
        for (from, to) in pairs {
            if !from.is_empty() && input[i..].starts_with(from.as_str()) {
                out.push_str(to);
                i += from.len();
                continue 'outer;
            }
        }
        let ch = input[i..].chars().next().expect("i < bytes_len implies a char remains");
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_without_rescanning_output() {
        let pairs = vec![("a".to_string(), "b".to_string()), ("b".to_string(), "c".to_string())];
        // If output were rescanned, the "a"->"b" substitution would then
        // match the second pair's "b"->"c" and yield "c".
        assert_eq!(simultaneous_replace("a", &pairs), "b");
    }

    #[test]
    fn first_matching_pair_wins_on_overlap() {
        let pairs = vec![("ab".to_string(), "X".to_string()), ("a".to_string(), "Y".to_string())];
        assert_eq!(simultaneous_replace("ab", &pairs), "X");
    }
}
