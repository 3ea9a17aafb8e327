//! Global constants used throughout the render engine.
//!
//! Centralizing these avoids scattering magic strings/numbers across the
//! component modules.

/// `api_version` strings this crate knows how to execute.
///
/// Only one version exists today, so there is no older version whose
/// behavior (e.g. disabling glob recursion) needs to be preserved — the
/// gate always resolves to "globbing enabled". See DESIGN.md for the
/// reasoning.
pub const SUPPORTED_API_VERSIONS: &[&str] = &["render/v1"];

/// Required value of a template bundle's `kind` field.
pub const SPEC_KIND: &str = "Template";

/// Default relative path to a template bundle's spec file.
pub const DEFAULT_SPEC_FILENAME: &str = "spec.yaml";

/// Builtin scope variable names injected by the pipeline driver.
///
/// Names starting with `_` are reserved for the core; user-declared inputs
/// may not use this prefix.
pub const BUILTIN_GIT_SHA: &str = "_git_sha";
pub const BUILTIN_GIT_SHORT_SHA: &str = "_git_short_sha";
pub const BUILTIN_GIT_TAG: &str = "_git_tag";

/// File mode applied to files created by `walk_and_modify`.
///
/// The OS ignores this for files that already exist; it only has visible
/// effect the rare times a content-mutating action creates a new file.
#[cfg(unix)]
pub const WALK_MODIFY_FILE_MODE: u32 = 0o700;
