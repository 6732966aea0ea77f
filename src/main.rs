//! techlearn - a live HTML/CSS/JS preview playground.

#![allow(dead_code)]

mod actor;
mod buffer;
mod cli;
mod compose;
mod config;
mod core;
mod editor;
mod embed;
mod exercise;
mod logger;
mod reload;
mod sandbox;
mod scheduler;
mod session;
mod utils;
mod workspace;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{PlaygroundConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = PlaygroundConfig::load(&cli)?;
    config.validate()?;
    let config = init_config(config);

    match &cli.command {
        Commands::Serve { dir, exercise, .. } => {
            cli::serve::serve(dir.as_deref(), exercise.as_deref())
        }
        Commands::Compose {
            dir,
            exercise,
            output,
            watch,
        } => cli::compose::compose(
            dir.as_deref(),
            exercise.as_deref(),
            output.as_deref(),
            *watch,
        ),
        Commands::Init {
            dir,
            exercise,
            force,
        } => cli::init::init_workspace(&config, dir.as_deref(), exercise.as_deref(), *force),
        Commands::Exercises => cli::exercises::list_exercises(&config),
    }
}
