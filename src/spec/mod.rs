//! The spec document's typed model, decoder, and structural validator.

pub mod decode;
pub mod model;
pub mod validate;

pub use model::{Action, Spec, Step};

use crate::core::RenderError;

/// Parse and validate a spec document's source text in one call.
pub fn load(source: &str) -> Result<Spec, RenderError> {
    let root = crate::yaml::parse(source)?;
    let spec = decode::decode_spec(&root)?;
    spec.validate()?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_minimal_greet_spec() {
        let source = r#"
api_version: render/v1
kind: Template
desc: Greet the user
inputs:
  - name: name
    desc: who to greet
steps:
  - desc: say hello
    action: print
    message: "Hello, {{.name}}!"
"#;
        let spec = load(source).unwrap();
        assert_eq!(spec.inputs.len(), 1);
        assert_eq!(spec.steps.len(), 1);
    }

    #[test]
    fn rejects_unknown_top_level_field() {
        let source = r#"
api_version: render/v1
kind: Template
bogus: true
steps:
  - action: print
    message: hi
"#;
        assert!(load(source).is_err());
    }
}
