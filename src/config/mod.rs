//! Playground configuration management for `techlearn.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── editor     # [editor]
//! │   ├── exercises  # [exercises]
//! │   ├── preview    # [preview] and [preview.sandbox]
//! │   └── serve      # [serve]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # PlaygroundConfig (this file)
//! ```
//!
//! The config file is optional: without one every section takes its
//! defaults and the project root is the current directory.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{EditorConfig, ExercisesConfig, PreviewConfig, ServeConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing techlearn.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file or cwd (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Preview document and sandbox settings
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Editor settings
    #[serde(default)]
    pub editor: EditorConfig,

    /// Exercise catalog settings
    #[serde(default)]
    pub exercises: ExercisesConfig,
}

impl PlaygroundConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. When none exists the
    /// defaults apply, rooted at cwd.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                Self {
                    root: std::env::current_dir().context("failed to read current directory")?,
                    ..Self::default()
                }
            }
        };

        config.root = crate::utils::path::normalize_path(&config.root);
        config.exercises.normalize(&config.root);
        config.apply_command_options(cli);
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    ///
    /// Unknown fields are reported and ignored.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Whether a config file was found.
    pub fn has_file(&self) -> bool {
        !self.config_path.as_os_str().is_empty()
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        if let Commands::Serve {
            interface,
            port,
            watch,
            ..
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            Self::update_option(&mut self.serve.watch, watch.as_ref());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.serve.validate(&mut diag);
        self.preview.validate(&mut diag);
        self.editor.validate(&mut diag);
        self.exercises.validate(&mut diag);

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PlaygroundConfig {
    let (parsed, ignored) = PlaygroundConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = PlaygroundConfig::from_str("[serve\nport = 1");
        assert!(result.is_err());
    }

    #[test]
    fn test_playground_config_default() {
        let config = PlaygroundConfig::default();

        assert!(!config.has_file());
        assert_eq!(config.serve.port, 5277);
        assert_eq!(config.editor.tab_width, 2);
        assert_eq!(config.exercises.default, "demo");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[serve]\nport = 4000\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = PlaygroundConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.serve.port, 4000);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = test_parse_config(
            "[serve]\nport = 0\n[editor]\ntab_width = 12\n[exercises]\ndefault = \"\"",
        );
        let err = config.validate().unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err:?}");
        };
        assert_eq!(diag.len(), 3);
    }

    #[test]
    fn test_cli_overrides_serve_section() {
        let cli = Cli::parse_from(["techlearn", "serve", "-p", "9000", "-w=false"]);
        let mut config = test_parse_config("[serve]\nport = 4000\nwatch = true");
        config.apply_command_options(&cli);

        assert_eq!(config.serve.port, 9000);
        assert!(!config.serve.watch);
    }

    #[test]
    fn test_exercises_dir_resolved_against_root() {
        let mut config = test_parse_config("[exercises]\ndir = \"lessons\"");
        config.exercises.normalize(Path::new("/project"));
        assert_eq!(config.exercises.dir, Some(PathBuf::from("/project/lessons")));
    }
}
