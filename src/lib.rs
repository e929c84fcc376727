//! Catscat - cat-sound dataset curation CLI tool.
//!
//! This crate turns raw, inconsistently named recordings from several sources
//! into a dataset of fixed-length clips centred on the sound of interest.

#![warn(missing_docs)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod constants;
pub mod curate;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod stages;

use clap::Parser;
use cli::{Cli, Command, ConfigAction, GlobalArgs};
use config::{Config, config_file_path, load_config, save_config, validate_config};
use pipeline::{Pipeline, Stage};
use stages::StageContext;
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for catscat CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.global.verbose, cli.global.quiet);

    handle_command(cli.command, &cli.global)
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Load the configuration, apply command-line overrides and validate it.
fn load_effective_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = load_config(global.config.as_deref())?;
    if let Some(root) = &global.root {
        config.folders.root.clone_from(root);
    }
    validate_config(&config)?;
    Ok(config)
}

fn handle_command(command: Command, global: &GlobalArgs) -> Result<()> {
    match command {
        Command::Run { stages, clean } => {
            let pipeline = match stages {
                Some(stages) => Pipeline::new(stages)?,
                None => Pipeline::full(),
            };
            run_pipeline(&pipeline, clean, global)
        }
        Command::Collect(args) => run_single(Stage::Collect, args.clean, global),
        Command::Convert(args) => run_single(Stage::Convert, args.clean, global),
        Command::Normalise(args) => run_single(Stage::Normalise, args.clean, global),
        Command::Extract(args) => run_single(Stage::Extract, args.clean, global),
        Command::Scratch(args) => run_single(Stage::Scratch, args.clean, global),
        Command::Perturb(args) => run_single(Stage::Perturb, args.clean, global),
        Command::Stages => {
            let config = load_effective_config(global)?;
            cli::help::print_stages(&config);
            Ok(())
        }
        Command::Config { action } => handle_config_command(action, global),
    }
}

fn run_single(stage: Stage, clean: bool, global: &GlobalArgs) -> Result<()> {
    run_pipeline(&Pipeline::new(vec![stage])?, clean, global)
}

fn run_pipeline(pipeline: &Pipeline, clean: bool, global: &GlobalArgs) -> Result<()> {
    use std::time::Instant;

    let total_start = Instant::now();
    let config = load_effective_config(global)?;
    let ctx = StageContext::new(&config, global.progress_enabled());

    info!(
        "Dataset root: {}",
        config.folders.root.display()
    );

    let reports = pipeline.run(&ctx, clean)?;

    let written: usize = reports.iter().map(|r| r.outputs.len()).sum();
    let failed: usize = reports.iter().map(|r| r.failed).sum();
    info!(
        "Complete: {} stage(s), {} file(s) written in {:.2}s",
        reports.len(),
        written,
        total_start.elapsed().as_secs_f64()
    );

    if failed > 0 {
        warn!("{failed} file(s) could not be processed");
    }

    Ok(())
}

fn handle_config_command(action: ConfigAction, global: &GlobalArgs) -> Result<()> {
    let path = match &global.config {
        Some(path) => path.clone(),
        None => config_file_path()?,
    };

    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), &path)?;
                println!("Created configuration file: {}", path.display());
                println!("\nNext steps:");
                println!("  Set folders.root to your dataset directory, then run:");
                println!("  catscat run");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_effective_config(global)?;
            let contents =
                toml::to_string_pretty(&config).map_err(|e| Error::ConfigSerialize { source: e })?;
            print!("{contents}");
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
