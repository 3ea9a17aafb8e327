//! Black-box unit tests exercising the public API surface directly (most
//! component-level unit tests live alongside their implementation in
//! `#[cfg(test)]` modules under `src/`).

use render_core::core::RenderError;
use render_core::scope::Scope;
use render_core::spec;

#[test]
fn rejects_spec_with_empty_steps() {
    let source = r#"
api_version: render/v1
kind: Template
steps: []
"#;
    let err = spec::load(source).unwrap_err();
    assert!(matches!(err, RenderError::Validation { .. }));
}

#[test]
fn rejects_spec_missing_required_field() {
    let source = r#"
kind: Template
steps:
  - action: print
    message: hi
"#;
    assert!(spec::load(source).is_err());
}

#[test]
fn for_each_iterator_requires_values_or_values_from() {
    let source = r#"
api_version: render/v1
kind: Template
steps:
  - action: for_each
    iterator:
      key: item
    steps:
      - action: print
        message: "{{.item}}"
"#;
    let err = spec::load(source).unwrap_err();
    assert!(matches!(err, RenderError::Validation { .. }));
}

#[test]
fn scope_chain_shadows_inner_to_outer() {
    let root = Scope::root().push_one("name", "outer");
    let inner = root.push_one("name", "inner");
    assert_eq!(inner.lookup("name"), Some("inner"));
    assert_eq!(root.lookup("name"), Some("outer"));
}
