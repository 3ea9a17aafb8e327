//! render-core: a spec-driven template rendering engine.
//!
//! A render consumes a *template bundle* — a directory holding source
//! files plus a declarative YAML spec describing how to transform them —
//! and produces a tree of output files under a destination directory. The
//! spec is a sequence of steps (`print`, `include`, `append`,
//! `string_replace`, `regex_replace`, `regex_name_lookup`, `go_template`,
//! `for_each`) executed against a chained variable scope, staged into a
//! scratch directory and committed to the destination only once every step
//! has succeeded.
//!
//! # Core Modules
//!
//! - [`yaml`] - position-carrying YAML parsing
//! - [`spec`] - the spec document's typed model, decoder, and validator
//! - [`scope`] - persistent chained variable bindings
//! - [`templating`] - the curated text-template engine adapter (built on `tera`)
//! - [`expr`] - the CEL-based expression engine adapter
//! - [`fs_safety`] - path sanitization, checked directory creation, recursive copy
//! - [`exec`] - the action executor (one module per step kind)
//! - [`pipeline`] - the render driver: input resolution, scratch build, two-phase commit
//! - [`cancel`] - cooperative cancellation
//! - [`core`] - the shared error type and source-position type
//!
//! # Usage
//!
//! ```no_run
//! use render_core::{pipeline, spec};
//! use render_core::cancel::CancellationToken;
//! use std::collections::BTreeMap;
//! use std::path::PathBuf;
//!
//! let source = std::fs::read_to_string("spec.yaml").unwrap();
//! let parsed = spec::load(&source).unwrap();
//! let config = pipeline::RenderConfig {
//!     template_dir: PathBuf::from("."),
//!     dest_dir: PathBuf::from("./out"),
//!     inputs: BTreeMap::new(),
//!     force_overwrite: false,
//!     keep_temp_dirs: false,
//!     backup_root: PathBuf::from("/tmp/render-backups"),
//!     git_sha: None,
//!     git_short_sha: None,
//!     git_tag: None,
//! };
//! let mut stdout = std::io::stdout();
//! pipeline::render(&parsed, &config, &mut stdout, &CancellationToken::new()).unwrap();
//! ```

pub mod cancel;
pub mod constants;
pub mod core;
pub mod exec;
pub mod expr;
pub mod fs_safety;
pub mod pipeline;
pub mod scope;
pub mod spec;
pub mod templating;
pub mod yaml;
