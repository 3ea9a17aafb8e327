//! The pipeline driver: resolves inputs, builds a scratch copy of the
//! render, and commits it to the destination directory in two passes.

use crate::cancel::CancellationToken;
use crate::core::{JoinedError, RenderError};
use crate::exec::{ExecState, execute_steps};
use crate::expr;
use crate::fs_safety::copy::{CopyHint, CopyParams, copy_recursive};
use crate::scope::Scope;
use crate::spec::Spec;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Inputs the driver needs that aren't part of the spec document itself.
pub struct RenderConfig {
    pub template_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub inputs: BTreeMap<String, String>,
    pub force_overwrite: bool,
    pub keep_temp_dirs: bool,
    pub backup_root: PathBuf,
    pub git_sha: Option<String>,
    pub git_short_sha: Option<String>,
    pub git_tag: Option<String>,
}

/// The scratch→destination commit's state machine. Failure in either of
/// the first two states leaves the destination directory untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitState {
    BuildingScratch,
    DryRunCommit,
    RealCommit,
    Done,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Single(#[from] RenderError),
    #[error(transparent)]
    Joined(#[from] JoinedError),
}

/// Run a full render: resolve inputs against `spec`, execute its steps
/// into a scratch directory, then commit scratch to `config.dest_dir`.
///
/// # Errors
///
/// See [`PipelineError`]. Cleanup failures that happen while unwinding
/// from an earlier error are reported via [`PipelineError::Joined`] so
/// neither is silently dropped.
pub fn render(
    spec: &Spec,
    config: &RenderConfig,
    stdout: &mut dyn Write,
    cancel: &CancellationToken,
) -> Result<(), PipelineError> {
    let scope = resolve_inputs(spec, config)?;

    let scratch_dir = tempfile::Builder::new()
        .prefix("render-scratch-")
        .tempdir()
        .map_err(|e| RenderError::io("<scratch dir>", e))?;
    debug!(path = %scratch_dir.path().display(), "created scratch directory");

    let mut state = CommitState::BuildingScratch;
    let outcome = run_to_commit(spec, config, &scope, scratch_dir.path(), stdout, cancel, &mut state);

    let backup_created = state != CommitState::BuildingScratch && config_has_backup(config);
    let cleanup = cleanup_temp_dirs(config, scratch_dir.path(), backup_created);

    match (outcome, cleanup) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(cleanup_err)) => Err(PipelineError::Single(cleanup_err)),
        (Err(primary), Ok(())) => Err(PipelineError::Single(primary)),
        (Err(primary), Err(cleanup_err)) => Err(PipelineError::Joined(JoinedError::new(primary, cleanup_err))),
    }
}

fn config_has_backup(config: &RenderConfig) -> bool {
    config.backup_root.exists()
}

fn run_to_commit(
    spec: &Spec,
    config: &RenderConfig,
    scope: &Scope,
    scratch_dir: &Path,
    stdout: &mut dyn Write,
    cancel: &CancellationToken,
    state: &mut CommitState,
) -> Result<(), RenderError> {
    let exec_state = ExecState::new(
        config.template_dir.clone(),
        scratch_dir.to_path_buf(),
        config.dest_dir.clone(),
        stdout,
        cancel.clone(),
    );
    execute_steps(&exec_state, &spec.steps, scope)?;

    if config.dest_dir.exists() && !config.dest_dir.is_dir() {
        return Err(RenderError::DirFileConflict {
            path: config.dest_dir.display().to_string(),
        });
    }
    if !config.dest_dir.exists() {
        std::fs::create_dir_all(&config.dest_dir)
            .map_err(|e| RenderError::io(config.dest_dir.display().to_string(), e))?;
    }

    let included = exec_state.included_from_dest.into_inner();
    let hint_for = |rel: &Path, _is_dir: bool| CopyHint {
        overwrite: config.force_overwrite || included.contains(rel),
        backup_if_exists: true,
        skip: false,
    };

    *state = CommitState::DryRunCommit;
    cancel.check()?;
    let dry_run_params = CopyParams {
        src_root: scratch_dir,
        dest_root: &config.dest_dir,
        backup_root: &config.backup_root,
        dry_run: true,
    };
    copy_recursive(&dry_run_params, hint_for)?;

    *state = CommitState::RealCommit;
    cancel.check()?;
    let real_params = CopyParams {
        src_root: scratch_dir,
        dest_root: &config.dest_dir,
        backup_root: &config.backup_root,
        dry_run: false,
    };
    copy_recursive(&real_params, hint_for)?;
    info!(dest = %config.dest_dir.display(), "render committed");

    *state = CommitState::Done;
    Ok(())
}

fn cleanup_temp_dirs(config: &RenderConfig, scratch_dir: &Path, backup_created: bool) -> Result<(), RenderError> {
    if config.keep_temp_dirs {
        return Ok(());
    }
    if scratch_dir.exists() {
        std::fs::remove_dir_all(scratch_dir).map_err(|e| RenderError::io(scratch_dir.display().to_string(), e))?;
    }
    if backup_created && config.backup_root.exists() {
        std::fs::remove_dir_all(&config.backup_root)
            .map_err(|e| RenderError::io(config.backup_root.display().to_string(), e))?;
    }
    Ok(())
}

/// Resolve `config.inputs` against `spec.inputs`' defaults, validate, and
/// build the initial scope (resolved inputs plus the builtin `_git_*`
/// variables).
fn resolve_inputs(spec: &Spec, config: &RenderConfig) -> Result<Scope, RenderError> {
    let declared: std::collections::BTreeSet<&str> =
        spec.inputs.iter().map(|i| i.name.value.as_str()).collect();
    let mut unknown: Vec<&str> = config
        .inputs
        .keys()
        .map(String::as_str)
        .filter(|k| !declared.contains(k))
        .collect();
    unknown.sort_unstable();
    if !unknown.is_empty() {
        return Err(RenderError::Input {
            message: format!("unknown input(s): {}", unknown.join(", ")),
        });
    }

    let mut resolved = BTreeMap::new();
    for input in &spec.inputs {
        let value = match config.inputs.get(&input.name.value) {
            Some(v) => v.clone(),
            None => match &input.default {
                Some(default) => default.value.clone(),
                None => {
                    return Err(RenderError::Input {
                        message: format!("missing required input '{}'", input.name.value),
                    });
                }
            },
        };

        let rule_scope = Scope::root().push_one("value", value.clone());
        for rule in &input.rules {
            if !expr::eval_bool(rule.pos, &rule.rule.value, &rule_scope)? {
                let message = rule
                    .message
                    .as_ref()
                    .map_or_else(|| format!("input '{}' failed rule: {}", input.name.value, rule.rule.value), |m| m.value.clone());
                return Err(RenderError::Input { message });
            }
        }

        resolved.insert(input.name.value.clone(), value);
    }

    resolved.insert(
        crate::constants::BUILTIN_GIT_SHA.to_string(),
        config.git_sha.clone().unwrap_or_default(),
    );
    resolved.insert(
        crate::constants::BUILTIN_GIT_SHORT_SHA.to_string(),
        config.git_short_sha.clone().unwrap_or_default(),
    );
    resolved.insert(
        crate::constants::BUILTIN_GIT_TAG.to_string(),
        config.git_tag.clone().unwrap_or_default(),
    );

    Ok(Scope::from_vars(resolved))
}
