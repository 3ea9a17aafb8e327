//! Position-carrying YAML parsing.
//!
//! `spec::decode` builds typed model structs out of the [`marked::MarkedYaml`]
//! tree produced here, instead of decoding straight from `serde_yaml` — the
//! whole point of taking this detour is that every error raised downstream
//! can point at a line and column in the source document.

pub mod decode;
pub mod marked;

pub use marked::{MarkedYaml, YamlValue, parse};
