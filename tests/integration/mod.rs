//! End-to-end scenarios driving the full pipeline against real temp
//! directories.

use render_core::cancel::CancellationToken;
use render_core::core::RenderError;
use render_core::pipeline::{self, PipelineError, RenderConfig};
use render_core::spec;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn write(dir: &Path, rel: &str, contents: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn run(
    template_dir: &Path,
    dest_dir: &Path,
    backup_root: &Path,
    inputs: &[(&str, &str)],
    force_overwrite: bool,
) -> Result<String, PipelineError> {
    let source = fs::read_to_string(template_dir.join("spec.yaml")).unwrap();
    let parsed = spec::load(&source).unwrap();
    let config = RenderConfig {
        template_dir: template_dir.to_path_buf(),
        dest_dir: dest_dir.to_path_buf(),
        inputs: inputs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect::<BTreeMap<_, _>>(),
        force_overwrite,
        keep_temp_dirs: true,
        backup_root: backup_root.to_path_buf(),
        git_sha: None,
        git_short_sha: None,
        git_tag: None,
    };
    let mut stdout = Vec::new();
    pipeline::render(&parsed, &config, &mut stdout, &CancellationToken::new())?;
    Ok(String::from_utf8(stdout).unwrap())
}

/// S1: Greet — a single `print` step interpolating an input.
#[test]
fn s1_greet() {
    let template = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let backup = tempfile::tempdir().unwrap();
    write(
        template.path(),
        "spec.yaml",
        r#"
api_version: render/v1
kind: Template
inputs:
  - name: name
steps:
  - action: print
    message: "Hello, {{.name}}!"
"#,
    );
    let out = run(template.path(), dest.path(), backup.path(), &[("name", "World")], false).unwrap();
    assert_eq!(out, "Hello, World!\n");
}

/// S2: string replace with a templated path.
#[test]
fn s2_string_replace_with_templated_path() {
    let template = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let backup = tempfile::tempdir().unwrap();
    write(template.path(), "{{.module}}.txt", "hello placeholder world");
    write(
        template.path(),
        "spec.yaml",
        r#"
api_version: render/v1
kind: Template
inputs:
  - name: module
steps:
  - action: include
    include:
      - paths: ["{{.module}}.txt"]
  - action: string_replace
    paths: ["{{.module}}.txt"]
    replacements:
      - to_replace: "placeholder"
        with: "{{.module}}"
"#,
    );
    run(template.path(), dest.path(), backup.path(), &[("module", "widget")], false).unwrap();
    let contents = fs::read_to_string(dest.path().join("widget.txt")).unwrap();
    assert_eq!(contents, "hello widget world");
}

/// S3: regex replace where the regex's own named capture group names the
/// scope variable to interpolate — the group name must be expanded into
/// the template string before that string is rendered, not after.
#[test]
fn s3_regex_replace_named_subgroup() {
    let template = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let backup = tempfile::tempdir().unwrap();
    write(template.path(), "a.txt", "alpha template_foo beta");
    write(
        template.path(),
        "spec.yaml",
        r#"
api_version: render/v1
kind: Template
inputs:
  - name: foo
steps:
  - action: include
    include:
      - paths: ["a.txt"]
  - action: regex_replace
    paths: ["."]
    replacements:
      - regex: "template_(?P<mysubgroup>[a-z]+)"
        with: "{{.${mysubgroup}}}"
"#,
    );
    run(template.path(), dest.path(), backup.path(), &[("foo", "bar")], false).unwrap();
    let contents = fs::read_to_string(dest.path().join("a.txt")).unwrap();
    assert_eq!(contents, "alpha bar beta");
}

/// S4: include with `strip_prefix`/`add_prefix`.
#[test]
fn s4_include_strip_and_add_prefix() {
    let template = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let backup = tempfile::tempdir().unwrap();
    write(template.path(), "src/inner/file.txt", "payload");
    write(
        template.path(),
        "spec.yaml",
        r#"
api_version: render/v1
kind: Template
steps:
  - action: include
    include:
      - paths: ["src/inner/file.txt"]
        strip_prefix: "src"
        add_prefix: "out"
"#,
    );
    run(template.path(), dest.path(), backup.path(), &[], false).unwrap();
    assert_eq!(fs::read_to_string(dest.path().join("out/inner/file.txt")).unwrap(), "payload");
}

/// S5: `for_each` nesting — outer scope is restored after the block.
#[test]
fn s5_for_each_nesting() {
    let template = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let backup = tempfile::tempdir().unwrap();
    write(
        template.path(),
        "spec.yaml",
        r#"
api_version: render/v1
kind: Template
steps:
  - action: for_each
    iterator:
      key: item
      values: ["a", "b", "c"]
    steps:
      - action: print
        message: "item={{.item}}"
  - action: print
    message: "done"
"#,
    );
    let out = run(template.path(), dest.path(), backup.path(), &[], false).unwrap();
    assert_eq!(out, "item=a\nitem=b\nitem=c\ndone\n");
}

/// CLI smoke test: the binary reports missing-required-argument failures
/// before ever touching a spec file.
#[test]
fn cli_requires_template_and_dest_dir() {
    let mut cmd = assert_cmd::Command::cargo_bin("render").unwrap();
    cmd.assert().failure().stderr(predicates::str::contains("required"));
}

/// S6: commit safety — refused without permission, backed up with it.
#[test]
fn s6_commit_safety_refuses_then_backs_up_with_force() {
    let template = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let backup_parent = tempfile::tempdir().unwrap();
    let backup_root = backup_parent.path().join("backups");
    write(template.path(), "file.txt", "new content");
    write(
        template.path(),
        "spec.yaml",
        r#"
api_version: render/v1
kind: Template
steps:
  - action: include
    include:
      - paths: ["file.txt"]
"#,
    );
    fs::write(dest.path().join("file.txt"), "original content").unwrap();

    let err = run(template.path(), dest.path(), &backup_root, &[], false).unwrap_err();
    assert!(matches!(err, PipelineError::Single(RenderError::OverwriteRefused { .. })));
    assert_eq!(fs::read_to_string(dest.path().join("file.txt")).unwrap(), "original content");

    run(template.path(), dest.path(), &backup_root, &[], true).unwrap();
    assert_eq!(fs::read_to_string(dest.path().join("file.txt")).unwrap(), "new content");
    assert_eq!(
        fs::read_to_string(backup_root.join("file.txt")).unwrap(),
        "original content"
    );
}
