//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Live HTML/CSS/JS preview playground
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: techlearn.toml)
    #[arg(short = 'C', long, default_value = "techlearn.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the playground server with live preview
    #[command(visible_alias = "s")]
    Serve {
        /// Workspace directory holding index.html, style.css and script.js
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Mirror workspace file changes into the editors
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,

        /// Start from this exercise's starter code
        #[arg(short, long)]
        exercise: Option<String>,
    },

    /// Compose the preview document once
    #[command(visible_alias = "c")]
    Compose {
        /// Workspace directory (default: the exercise's starter code)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,

        /// Compose this exercise's starter code
        #[arg(short, long)]
        exercise: Option<String>,

        /// Write the document here instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Keep running and rewrite the output on every workspace change
        #[arg(long, requires = "output", requires = "dir")]
        watch: bool,
    },

    /// Write an exercise's starter code into a workspace directory
    #[command(visible_alias = "i")]
    Init {
        /// Target directory (relative to current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,

        /// Exercise to start from
        #[arg(short, long)]
        exercise: Option<String>,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// List available exercises
    #[command(visible_alias = "ls")]
    Exercises,
}

impl Cli {
    /// Exercise requested on the command line, if any.
    pub fn exercise(&self) -> Option<&str> {
        match &self.command {
            Commands::Serve { exercise, .. }
            | Commands::Compose { exercise, .. }
            | Commands::Init { exercise, .. } => exercise.as_deref(),
            Commands::Exercises => None,
        }
    }
}
