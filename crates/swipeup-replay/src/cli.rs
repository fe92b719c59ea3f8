#![forbid(unsafe_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use swipeup_core::geometry::Viewport;
use swipeup_panel::PanelConfig;

use crate::error::{ReplayError, Result};
use crate::logging;
use crate::replay::{DEFAULT_FRAME_MS, DEFAULT_SETTLE_MS, replay};
use crate::script::Script;

#[derive(Debug, Parser)]
#[command(
    name = "swipeup-replay",
    about = "Replay gesture scripts against a swipeup panel",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit logs as JSON on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Debug-level logs for the swipeup crates when RUST_LOG is unset.
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a script and print one JSON record per frame.
    Run(RunArgs),

    /// Load and validate a panel config.
    #[command(name = "check-config")]
    CheckConfig(CheckConfigArgs),

    /// Print the default config as TOML.
    #[command(name = "print-config")]
    PrintConfig,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// JSON Lines gesture script.
    #[arg(long)]
    pub script: PathBuf,

    /// Panel config (`.json` is read as JSON, anything else as TOML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 400.0)]
    pub width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 800.0)]
    pub height: f64,

    /// Frame interval used to subdivide ticks.
    #[arg(long, default_value_t = DEFAULT_FRAME_MS)]
    pub frame_ms: u64,

    /// How long to wait for a pending commit after the last step.
    #[arg(long, default_value_t = DEFAULT_SETTLE_MS)]
    pub settle_ms: u64,

    /// Replace the commit motion with an instant tween.
    #[arg(long)]
    pub reduced_motion: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CheckConfigArgs {
    /// Config file to check.
    pub path: PathBuf,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json, cli.verbose);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Run(args) => run_script(&args, &mut out),
        Commands::CheckConfig(args) => check_config(&args, &mut out),
        Commands::PrintConfig => {
            out.write_all(PanelConfig::default().to_toml_string()?.as_bytes())?;
            Ok(())
        }
    }
}

pub fn run_script(args: &RunArgs, out: &mut impl Write) -> Result<()> {
    if !(args.width > 0.0 && args.height > 0.0) {
        return Err(ReplayError::invalid(format!(
            "viewport must be positive, got {}x{}",
            args.width, args.height
        )));
    }
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PanelConfig::default(),
    };
    if args.reduced_motion {
        config.motion = PanelConfig::reduced_motion().motion;
    }
    let script = Script::from_file(&args.script)?;
    tracing::info!(
        message = "replay.start",
        script = %args.script.display(),
        steps = script.len(),
        width = args.width,
        height = args.height
    );
    replay(
        &script,
        config,
        Viewport::new(args.width, args.height),
        args.frame_ms,
        args.settle_ms,
        out,
    )?;
    Ok(())
}

pub fn check_config(args: &CheckConfigArgs, out: &mut impl Write) -> Result<()> {
    let config = load_config(&args.path)?;
    writeln!(out, "{}: ok", args.path.display())?;
    tracing::debug!(message = "replay.config", ?config);
    Ok(())
}

/// Load a config, choosing the format from the extension.
pub fn load_config(path: &Path) -> Result<PanelConfig> {
    if !path.exists() {
        return Err(ReplayError::MissingPath {
            path: path.to_path_buf(),
        });
    }
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        PanelConfig::from_json_file(path)?
    } else {
        PanelConfig::from_toml_file(path)?
    };
    Ok(config)
}
