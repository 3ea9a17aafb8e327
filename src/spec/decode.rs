//! Decode a [`MarkedYaml`] tree into the typed [`super::model`] structs.
//!
//! The action field is read before anything else on a step node, then used
//! to pick which payload shape to decode the rest of the node as — the
//! polymorphic-without-inheritance trick the tagged `action` string exists
//! for.

use crate::core::RenderError;
use crate::spec::model::{
    Action, ForEachIterator, IncludeFrom, IncludeGroup, InputDecl, RegexLookup, RegexReplacement,
    Rule, Spec, Step, StringReplacement,
};
use crate::yaml::decode::{
    optional_field, reject_unknown_fields, require_array, require_bool, require_field,
    require_str, spanned_string, string_list,
};
use crate::yaml::marked::MarkedYaml;

pub fn decode_spec(root: &MarkedYaml) -> Result<Spec, RenderError> {
    reject_unknown_fields(root, &["api_version", "kind", "desc", "inputs", "steps"])?;
    let api_version = spanned_string(require_field(root, "api_version")?)?;
    let kind = spanned_string(require_field(root, "kind")?)?;
    let desc = optional_field(root, "desc").map(spanned_string).transpose()?;
    let inputs = match optional_field(root, "inputs") {
        Some(node) => require_array(node)?
            .iter()
            .map(decode_input)
            .collect::<Result<_, _>>()?,
        None => Vec::new(),
    };
    let steps_node = require_field(root, "steps")?;
    let steps = decode_steps(steps_node)?;
    if steps.is_empty() {
        return Err(RenderError::Validation {
            pos: steps_node.pos,
            message: "steps must not be empty".to_string(),
        });
    }
    Ok(Spec {
        pos: root.pos,
        api_version,
        kind,
        desc,
        inputs,
        steps,
    })
}

fn decode_input(node: &MarkedYaml) -> Result<InputDecl, RenderError> {
    reject_unknown_fields(node, &["name", "desc", "default", "rules"])?;
    let name = spanned_string(require_field(node, "name")?)?;
    let desc = optional_field(node, "desc").map(spanned_string).transpose()?;
    let default = optional_field(node, "default").map(spanned_string).transpose()?;
    let rules = match optional_field(node, "rules") {
        Some(n) => require_array(n)?.iter().map(decode_rule).collect::<Result<_, _>>()?,
        None => Vec::new(),
    };
    Ok(InputDecl {
        pos: node.pos,
        name,
        desc,
        default,
        rules,
    })
}

fn decode_rule(node: &MarkedYaml) -> Result<Rule, RenderError> {
    reject_unknown_fields(node, &["rule", "message"])?;
    let rule = spanned_string(require_field(node, "rule")?)?;
    let message = optional_field(node, "message").map(spanned_string).transpose()?;
    Ok(Rule {
        pos: node.pos,
        rule,
        message,
    })
}

fn decode_steps(node: &MarkedYaml) -> Result<Vec<Step>, RenderError> {
    require_array(node)?.iter().map(decode_step).collect()
}

fn decode_step(node: &MarkedYaml) -> Result<Step, RenderError> {
    reject_unknown_fields(
        node,
        &[
            "desc",
            "action",
            "if",
            "message",
            "include",
            "paths",
            "with",
            "skip_ensure_newline",
            "replacements",
            "iterator",
            "steps",
        ],
    )?;
    let desc = optional_field(node, "desc").map(spanned_string).transpose()?;
    let if_expr = optional_field(node, "if").map(spanned_string).transpose()?;
    let action_name = require_str(require_field(node, "action")?)?;

    let action = match action_name {
        "print" => Action::Print {
            message: spanned_string(require_field(node, "message")?)?,
        },
        "include" => Action::Include {
            groups: require_array(require_field(node, "include")?)?
                .iter()
                .map(decode_include_group)
                .collect::<Result<_, _>>()?,
        },
        "append" => Action::Append {
            paths: string_list(require_field(node, "paths")?)?,
            with: spanned_string(require_field(node, "with")?)?,
            skip_ensure_newline: match optional_field(node, "skip_ensure_newline") {
                Some(n) => require_bool(n)?,
                None => false,
            },
        },
        "string_replace" => Action::StringReplace {
            paths: string_list(require_field(node, "paths")?)?,
            replacements: require_array(require_field(node, "replacements")?)?
                .iter()
                .map(decode_string_replacement)
                .collect::<Result<_, _>>()?,
        },
        "regex_replace" => Action::RegexReplace {
            paths: string_list(require_field(node, "paths")?)?,
            replacements: require_array(require_field(node, "replacements")?)?
                .iter()
                .map(decode_regex_replacement)
                .collect::<Result<_, _>>()?,
        },
        "regex_name_lookup" => Action::RegexNameLookup {
            paths: string_list(require_field(node, "paths")?)?,
            replacements: require_array(require_field(node, "replacements")?)?
                .iter()
                .map(decode_regex_lookup)
                .collect::<Result<_, _>>()?,
        },
        "go_template" => Action::GoTemplate {
            paths: string_list(require_field(node, "paths")?)?,
        },
        "for_each" => Action::ForEach {
            iterator: decode_iterator(require_field(node, "iterator")?)?,
            steps: decode_steps(require_field(node, "steps")?)?,
        },
        other => {
            return Err(RenderError::Schema {
                pos: node.pos,
                message: format!(
                    "unknown action '{other}' (expected one of: print, include, append, \
                     string_replace, regex_replace, regex_name_lookup, go_template, for_each)"
                ),
            });
        }
    };

    Ok(Step {
        pos: node.pos,
        desc,
        if_expr,
        action,
    })
}

fn decode_include_group(node: &MarkedYaml) -> Result<IncludeGroup, RenderError> {
    reject_unknown_fields(
        node,
        &["paths", "from", "strip_prefix", "add_prefix", "as", "skip"],
    )?;
    let paths = string_list(require_field(node, "paths")?)?;
    let from = match optional_field(node, "from") {
        Some(n) => match require_str(n)? {
            "template" => IncludeFrom::Template,
            "destination" => IncludeFrom::Destination,
            other => {
                return Err(RenderError::Schema {
                    pos: n.pos,
                    message: format!("'from' must be 'template' or 'destination', found '{other}'"),
                });
            }
        },
        None => IncludeFrom::Template,
    };
    let strip_prefix = optional_field(node, "strip_prefix").map(spanned_string).transpose()?;
    let add_prefix = optional_field(node, "add_prefix").map(spanned_string).transpose()?;
    let r#as = optional_field(node, "as").map(string_list).transpose()?;
    let skip = match optional_field(node, "skip") {
        Some(n) => string_list(n)?,
        None => Vec::new(),
    };
    Ok(IncludeGroup {
        pos: node.pos,
        paths,
        from,
        strip_prefix,
        add_prefix,
        r#as,
        skip,
    })
}

fn decode_string_replacement(node: &MarkedYaml) -> Result<StringReplacement, RenderError> {
    reject_unknown_fields(node, &["to_replace", "with"])?;
    Ok(StringReplacement {
        pos: node.pos,
        to_replace: spanned_string(require_field(node, "to_replace")?)?,
        with: spanned_string(require_field(node, "with")?)?,
    })
}

fn decode_regex_replacement(node: &MarkedYaml) -> Result<RegexReplacement, RenderError> {
    reject_unknown_fields(node, &["regex", "with", "subgroup_to_replace"])?;
    Ok(RegexReplacement {
        pos: node.pos,
        regex: spanned_string(require_field(node, "regex")?)?,
        with: spanned_string(require_field(node, "with")?)?,
        subgroup_to_replace: optional_field(node, "subgroup_to_replace")
            .map(spanned_string)
            .transpose()?,
    })
}

fn decode_regex_lookup(node: &MarkedYaml) -> Result<RegexLookup, RenderError> {
    reject_unknown_fields(node, &["regex"])?;
    Ok(RegexLookup {
        pos: node.pos,
        regex: spanned_string(require_field(node, "regex")?)?,
    })
}

fn decode_iterator(node: &MarkedYaml) -> Result<ForEachIterator, RenderError> {
    reject_unknown_fields(node, &["key", "values", "values_from"])?;
    let key = spanned_string(require_field(node, "key")?)?;
    let values = optional_field(node, "values").map(string_list).transpose()?;
    let values_from = optional_field(node, "values_from").map(spanned_string).transpose()?;
    Ok(ForEachIterator {
        pos: node.pos,
        key,
        values,
        values_from,
    })
}
