//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod color;
mod replay;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, SketchConfig};
use crate::logging::{init_logging, LoggingConfig};
use crate::output::MAX_SCALE;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Sketchgrid - paint a square pixel canvas and save it as PNG
#[derive(Parser)]
#[command(name = "sketch")]
#[command(about = "Sketchgrid - paint a square pixel canvas and save it as PNG")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to sketch.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recorded editing session and save the canvas as PNG
    Replay {
        /// Session file: one JSON5 event object per record
        session: PathBuf,

        /// Output file or directory (default: export.filename from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-16, default: export.scale from config)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=MAX_SCALE as i64))]
        scale: Option<u8>,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Save an empty (fully transparent) canvas
    Blank {
        /// Side length, validated like a resize request (default: grid.default_resolution)
        #[arg(long)]
        size: Option<String>,

        /// Output file or directory (default: export.filename from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-16, default: export.scale from config)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=MAX_SCALE as i64))]
        scale: Option<u8>,
    },

    /// Parse CSS color strings and print their RGBA values
    Color {
        /// Colors to parse, e.g. "#f80" "rgba(0, 0, 0, 0.5)" tomato
        #[arg(required = true)]
        colors: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the named colors
    Names,
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_verbosity(cli.verbose));

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Replay { session, output, scale, strict } => {
            with_config(config_path, |config| {
                replay::run_replay(config, &session, output.as_deref(), scale, strict)
            })
        }
        Commands::Blank { size, output, scale } => with_config(config_path, |config| {
            replay::run_blank(config, size.as_deref(), output.as_deref(), scale)
        }),
        Commands::Color { colors, json } => color::run_color(&colors, json),
        Commands::Names => color::run_names(),
    }
}

/// Load configuration and hand it to `f`, reporting load failures.
fn with_config(path: Option<&Path>, f: impl FnOnce(&SketchConfig) -> ExitCode) -> ExitCode {
    match load_config(path) {
        Ok(config) => f(&config),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_INVALID_ARGS)
        }
    }
}
