//! `render` CLI entry point.
//!
//! Parses a template bundle's inputs from the command line, loads its spec
//! document, and runs the render pipeline synchronously — there is no
//! async runtime here, matching the engine's single-threaded execution
//! model.

use clap::Parser;
use render_core::cancel::CancellationToken;
use render_core::pipeline::{self, RenderConfig};
use render_core::spec;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Render a template bundle into a destination directory.
#[derive(Parser, Debug)]
#[command(name = "render", version, about)]
struct Cli {
    /// Directory containing the template bundle's spec file and source
    /// files.
    #[arg(short = 't', long, value_name = "DIR")]
    template_dir: PathBuf,

    /// Directory to write the rendered output into.
    #[arg(short = 'd', long, value_name = "DIR")]
    dest_dir: PathBuf,

    /// Relative path to the spec file within `template_dir`.
    #[arg(long, default_value = "spec.yaml")]
    spec_file: String,

    /// Input value `name=value`. May be repeated.
    #[arg(short = 'i', long = "input", value_name = "NAME=VALUE")]
    inputs: Vec<String>,

    /// Allow overwriting destination files outside of incremental includes.
    #[arg(long)]
    force_overwrite: bool,

    /// Keep the scratch and backup directories after the render finishes
    /// (for inspection or debugging).
    #[arg(long)]
    keep_temp_dirs: bool,

    /// Root directory for pre-overwrite backups. Defaults to
    /// `<home>/.render/backups/<unique>`.
    #[arg(long, value_name = "DIR")]
    backup_root: Option<PathBuf>,

    #[arg(long, env = "RENDER_GIT_SHA")]
    git_sha: Option<String>,
    #[arg(long, env = "RENDER_GIT_SHORT_SHA")]
    git_short_sha: Option<String>,
    #[arg(long, env = "RENDER_GIT_TAG")]
    git_tag: Option<String>,

    /// Enable debug-level logging when `RUST_LOG` isn't set.
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn parse_inputs(&self) -> Result<BTreeMap<String, String>, String> {
        let mut map = BTreeMap::new();
        for raw in &self.inputs {
            let (name, value) = raw
                .split_once('=')
                .ok_or_else(|| format!("input '{raw}' is not in the form name=value"))?;
            map.insert(name.to_string(), value.to_string());
        }
        Ok(map)
    }

    fn default_backup_root(&self) -> PathBuf {
        let base = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
        let epoch = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        base.join(".render")
            .join("backups")
            .join(format!("{epoch}-{}", std::process::id()))
    }
}

fn init_logging(verbose: bool) {
    let rust_log_exists = std::env::var("RUST_LOG").is_ok();
    let filter = if rust_log_exists {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let inputs = cli.parse_inputs()?;
    let spec_path = cli.template_dir.join(&cli.spec_file);
    let source = std::fs::read_to_string(&spec_path)
        .map_err(|e| format!("reading spec file {}: {e}", spec_path.display()))?;
    let parsed = spec::load(&source).map_err(|e| e.to_string())?;

    let backup_root = cli.backup_root.clone().unwrap_or_else(|| cli.default_backup_root());
    let config = RenderConfig {
        template_dir: cli.template_dir.clone(),
        dest_dir: cli.dest_dir.clone(),
        inputs,
        force_overwrite: cli.force_overwrite,
        keep_temp_dirs: cli.keep_temp_dirs,
        backup_root,
        git_sha: cli.git_sha.clone(),
        git_short_sha: cli.git_short_sha.clone(),
        git_tag: cli.git_tag.clone(),
    };

    let mut stdout = std::io::stdout();
    pipeline::render(&parsed, &config, &mut stdout, &CancellationToken::new()).map_err(|e| e.to_string())
}
