//! CLI argument definitions.

use crate::pipeline::Stage;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Curate cat-sound recordings into a fixed-length training dataset.
#[derive(Debug, Parser)]
#[command(name = "catscat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run several stages in order (default: all of them).
    Run {
        /// Stages to run (comma-separated, in execution order).
        #[arg(short, long, value_enum, value_delimiter = ',')]
        stages: Option<Vec<Stage>>,

        /// Empty each destination folder before writing to it.
        #[arg(long)]
        clean: bool,
    },
    /// Merge every source's cleaned data into one numbered tree.
    Collect(StageArgs),
    /// Downmix collected clips to mono and resample them.
    Convert(StageArgs),
    /// Peak-normalise mono clips.
    Normalise(StageArgs),
    /// Cut a target window from single-event clips.
    Extract(StageArgs),
    /// Cut target windows from scratch recordings in two passes.
    Scratch(StageArgs),
    /// Write gain-shifted copies of targeted clips.
    Perturb(StageArgs),
    /// List the stages of the default pipeline.
    Stages,
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments of a single-stage subcommand.
#[derive(Debug, Clone, Args)]
pub struct StageArgs {
    /// Empty the destination folder before writing to it.
    #[arg(long)]
    pub clean: bool,
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Configuration file (default: platform config directory).
    #[arg(short, long, global = true, env = "CATSCAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Dataset root directory (overrides folders.root).
    #[arg(long, global = true, env = "CATSCAT_ROOT")]
    pub root: Option<PathBuf>,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable progress bars.
    #[arg(long, global = true)]
    pub no_progress: bool,
}

impl GlobalArgs {
    /// Whether progress bars should be drawn.
    #[must_use]
    pub fn progress_enabled(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}
