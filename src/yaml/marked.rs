//! A minimal YAML tree that remembers where every node came from.
//!
//! `serde_yaml::Value` throws the source location away during decode, and
//! `yaml_rust2::Yaml` does the same unless you drive the parser yourself.
//! This module does exactly that: it implements `yaml_rust2`'s
//! [`MarkedEventReceiver`] to build a generic tree where every scalar,
//! sequence, and mapping carries the [`Pos`] of its opening token. The
//! `spec::decode` module walks this tree into the typed model structs,
//! which is what lets every schema/validation error in the crate report
//! "at line L col C: …".

use crate::core::{Pos, RenderError};
use yaml_rust2::parser::{MarkedEventReceiver, Parser};
use yaml_rust2::{Event, scanner::Marker};

/// A YAML node annotated with the position of its first token.
#[derive(Debug, Clone)]
pub struct MarkedYaml {
    pub pos: Pos,
    pub value: YamlValue,
}

#[derive(Debug, Clone)]
pub enum YamlValue {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    String(String),
    Array(Vec<MarkedYaml>),
    /// Preserves document order; keys are themselves positioned so an
    /// "unknown field" error can point at the key, not the enclosing map.
    Hash(Vec<(MarkedYaml, MarkedYaml)>),
}

impl MarkedYaml {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            YamlValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_hash(&self) -> Option<&[(MarkedYaml, MarkedYaml)]> {
        match &self.value {
            YamlValue::Hash(h) => Some(h.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[MarkedYaml]> {
        match &self.value {
            YamlValue::Array(a) => Some(a.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match &self.value {
            YamlValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Look up a key in a hash node by name, returning the value node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MarkedYaml> {
        self.as_hash()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    fn type_name(&self) -> &'static str {
        match &self.value {
            YamlValue::Null => "null",
            YamlValue::Bool(_) => "bool",
            YamlValue::Int(_) => "int",
            YamlValue::Real(_) => "float",
            YamlValue::String(_) => "string",
            YamlValue::Array(_) => "sequence",
            YamlValue::Hash(_) => "mapping",
        }
    }
}

fn marker_to_pos(m: Marker) -> Pos {
    // yaml_rust2 markers are 1-based lines, 0-based columns.
    Pos::new(m.line(), m.col() + 1)
}

/// Parse a YAML document's root node into a [`MarkedYaml`] tree.
///
/// # Errors
///
/// Returns [`RenderError::Parse`] if the document does not scan/parse, or
/// is empty, or contains more than one document.
pub fn parse(source: &str) -> Result<MarkedYaml, RenderError> {
    let mut receiver = TreeBuilder::default();
    let mut parser = Parser::new(source.chars());
    parser.load(&mut receiver, false).map_err(|e| RenderError::Parse {
        pos: Pos::new(e.marker().line(), e.marker().col() + 1),
        message: e.to_string(),
    })?;

    if let Some(err) = receiver.error {
        return Err(err);
    }

    receiver.root.ok_or_else(|| RenderError::Parse {
        pos: Pos::default(),
        message: "empty YAML document".to_string(),
    })
}

/// Builds a [`MarkedYaml`] tree by hand-walking the parser's event stream.
///
/// Mirrors `yaml_rust2::YamlLoader`'s stack-of-partially-built-collections
/// approach, but keeps the `Marker` of each collection's opening event.
#[derive(Default)]
struct TreeBuilder {
    /// Stack of (pos, partially-built collection, pending-key-for-hash).
    stack: Vec<PartialNode>,
    root: Option<MarkedYaml>,
    error: Option<RenderError>,
}

enum PartialNode {
    Array { pos: Pos, items: Vec<MarkedYaml> },
    Hash {
        pos: Pos,
        pairs: Vec<(MarkedYaml, MarkedYaml)>,
        pending_key: Option<MarkedYaml>,
    },
}

impl TreeBuilder {
    fn push_complete(&mut self, node: MarkedYaml) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(PartialNode::Array { items, .. }) => items.push(node),
            Some(PartialNode::Hash {
                pairs,
                pending_key,
                ..
            }) => {
                if let Some(key) = pending_key.take() {
                    pairs.push((key, node));
                } else {
                    *pending_key = Some(node);
                }
            }
        }
    }

    /// Resolve a plain (unquoted) scalar using YAML's core schema rules.
    /// Quoted scalars skip this entirely and stay strings (handled by the
    /// caller).
    fn resolve_plain_scalar(value: &str) -> YamlValue {
        match value {
            "~" | "null" | "Null" | "NULL" | "" => YamlValue::Null,
            "true" | "True" | "TRUE" => YamlValue::Bool(true),
            "false" | "False" | "FALSE" => YamlValue::Bool(false),
            _ => {
                if let Ok(i) = value.parse::<i64>() {
                    YamlValue::Int(i)
                } else if let Ok(f) = value.parse::<f64>() {
                    YamlValue::Real(f)
                } else {
                    YamlValue::String(value.to_string())
                }
            }
        }
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        if self.error.is_some() {
            return;
        }
        match ev {
            Event::Scalar(value, style, _anchor_id, tag) => {
                let is_plain = matches!(style, yaml_rust2::scanner::TScalarStyle::Plain);
                let value_kind = if is_plain && tag.is_none() {
                    Self::resolve_plain_scalar(&value)
                } else {
                    YamlValue::String(value)
                };
                self.push_complete(MarkedYaml {
                    pos: marker_to_pos(mark),
                    value: value_kind,
                });
            }
            Event::SequenceStart(..) => {
                self.stack.push(PartialNode::Array {
                    pos: marker_to_pos(mark),
                    items: Vec::new(),
                });
            }
            Event::SequenceEnd => {
                if let Some(PartialNode::Array { pos, items }) = self.stack.pop() {
                    self.push_complete(MarkedYaml {
                        pos,
                        value: YamlValue::Array(items),
                    });
                } else {
                    self.error = Some(RenderError::Parse {
                        pos: marker_to_pos(mark),
                        message: "unbalanced sequence end".to_string(),
                    });
                }
            }
            Event::MappingStart(..) => {
                self.stack.push(PartialNode::Hash {
                    pos: marker_to_pos(mark),
                    pairs: Vec::new(),
                    pending_key: None,
                });
            }
            Event::MappingEnd => match self.stack.pop() {
                Some(PartialNode::Hash {
                    pos,
                    pairs,
                    pending_key: None,
                }) => {
                    self.push_complete(MarkedYaml {
                        pos,
                        value: YamlValue::Hash(pairs),
                    });
                }
                _ => {
                    self.error = Some(RenderError::Parse {
                        pos: marker_to_pos(mark),
                        message: "unbalanced mapping end".to_string(),
                    });
                }
            },
            Event::Alias(_) => {
                self.error = Some(RenderError::Parse {
                    pos: marker_to_pos(mark),
                    message: "YAML aliases are not supported".to_string(),
                });
            }
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}
        }
    }
}

/// Helper used by `spec::decode` to format a "expected X, got Y" schema
/// error with the node's own position.
pub fn type_mismatch(node: &MarkedYaml, expected: &str) -> RenderError {
    RenderError::Schema {
        pos: node.pos,
        message: format!("expected {expected}, found {}", node.type_name()),
    }
}
