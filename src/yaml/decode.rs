//! Small decode helpers shared by `spec::decode`.
//!
//! These wrap [`MarkedYaml`] accessors with the "at line L col C: field X
//! is required" / "unknown field" error shapes, so the actual per-type
//! decoders in `spec::decode` read as a sequence of `require_*` calls
//! instead of repeating error-construction boilerplate.

use crate::core::{Pos, RenderError};
use crate::yaml::marked::{MarkedYaml, YamlValue};

/// Require the node to be a mapping, returning its pairs.
pub fn require_hash<'a>(
    node: &'a MarkedYaml,
) -> Result<&'a [(MarkedYaml, MarkedYaml)], RenderError> {
    node.as_hash()
        .ok_or_else(|| crate::yaml::marked::type_mismatch(node, "a mapping"))
}

/// Require the node to be a sequence, returning its items.
pub fn require_array<'a>(node: &'a MarkedYaml) -> Result<&'a [MarkedYaml], RenderError> {
    node.as_array()
        .ok_or_else(|| crate::yaml::marked::type_mismatch(node, "a sequence"))
}

/// Require the node to be a string scalar.
pub fn require_str<'a>(node: &'a MarkedYaml) -> Result<&'a str, RenderError> {
    node.as_str()
        .ok_or_else(|| crate::yaml::marked::type_mismatch(node, "a string"))
}

/// Require the node to be a bool scalar.
pub fn require_bool(node: &MarkedYaml) -> Result<bool, RenderError> {
    node.as_bool()
        .ok_or_else(|| crate::yaml::marked::type_mismatch(node, "a bool"))
}

/// Look up a required field on a mapping, erroring with the *mapping's*
/// position (not the key's — there is no key to point at when it's
/// missing).
pub fn require_field<'a>(
    map_node: &'a MarkedYaml,
    field: &str,
) -> Result<&'a MarkedYaml, RenderError> {
    map_node.get(field).ok_or_else(|| RenderError::Schema {
        pos: map_node.pos,
        message: format!("field '{field}' is required"),
    })
}

/// Look up an optional field.
pub fn optional_field<'a>(map_node: &'a MarkedYaml, field: &str) -> Option<&'a MarkedYaml> {
    map_node.get(field)
}

/// Reject any key in `map_node` not present in `allowed` — the position
/// of the error is the offending key's own position.
pub fn reject_unknown_fields(map_node: &MarkedYaml, allowed: &[&str]) -> Result<(), RenderError> {
    let pairs = require_hash(map_node)?;
    for (key, _) in pairs {
        let Some(key_str) = key.as_str() else {
            return Err(crate::yaml::marked::type_mismatch(key, "a string key"));
        };
        if !allowed.contains(&key_str) {
            return Err(RenderError::Schema {
                pos: key.pos,
                message: format!(
                    "unknown field '{key_str}' (expected one of: {})",
                    allowed.join(", ")
                ),
            });
        }
    }
    Ok(())
}

/// A primitive value paired with the position it was declared at — used
/// for spec fields (e.g. a templated string) whose position must survive
/// into runtime errors raised while expanding them.
#[derive(Debug, Clone)]
pub struct Spanned<T> {
    pub value: T,
    pub pos: Pos,
}

impl<T> Spanned<T> {
    pub fn new(value: T, pos: Pos) -> Self {
        Self { value, pos }
    }
}

pub fn spanned_string(node: &MarkedYaml) -> Result<Spanned<String>, RenderError> {
    Ok(Spanned::new(require_str(node)?.to_string(), node.pos))
}

pub fn string_list(node: &MarkedYaml) -> Result<Vec<Spanned<String>>, RenderError> {
    require_array(node)?.iter().map(spanned_string).collect()
}

pub fn is_null(node: &MarkedYaml) -> bool {
    matches!(node.value, YamlValue::Null)
}
