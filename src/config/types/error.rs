//! Errors raised while loading or validating `techlearn.toml`.
//!
//! Section validators never stop at the first problem: they push into a
//! shared [`ConfigDiagnostics`], and the whole batch is reported at once.

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid TOML")]
    Toml(#[from] toml::de::Error),

    // Displayed as-is; a `#[source]` would repeat every line in `{:#}` chains
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One rejected field value.
#[derive(Debug, Clone)]
struct Problem {
    field: FieldPath,
    message: String,
    hint: Option<String>,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {} {}", self.field.as_str().cyan(), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({} {})", "hint:".yellow(), hint)?;
        }
        Ok(())
    }
}

/// Validation findings of every section: errors fail the load, warnings are
/// only printed.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<Problem>,
    warnings: Vec<(FieldPath, String)>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.errors.push(Problem {
            field,
            message: message.into(),
            hint: None,
        });
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.errors.push(Problem {
            field,
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn warn(&mut self, field: FieldPath, message: impl Into<String>) {
        self.warnings.push((field, message.into()));
    }

    pub fn print_warnings(&self) {
        for (field, message) in &self.warnings {
            crate::log!("warning"; "[{}] {}", field.as_str(), message);
        }
    }

    pub fn warnings(&self) -> &[(FieldPath, String)] {
        &self.warnings
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        let noun = if count == 1 { "problem" } else { "problems" };
        write!(f, "{} ({count} {noun})", "invalid config".red().bold())?;
        for problem in &self.errors {
            write!(f, "\n{problem}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_names_file() {
        let err = ConfigError::Io(
            PathBuf::from("techlearn.toml"),
            Error::new(ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.to_string(), "cannot read `techlearn.toml`");
    }

    #[test]
    fn test_warnings_alone_pass() {
        let mut diag = ConfigDiagnostics::new();
        diag.warn(FieldPath::new("preview.sandbox.scripts"), "scripts disabled");
        assert_eq!(diag.warnings().len(), 1);
        assert!(diag.into_result().is_ok());
    }

    #[test]
    fn test_errors_listed_with_hints() {
        let mut diag = ConfigDiagnostics::new();
        diag.error_with_hint(FieldPath::new("serve.port"), "must not be 0", "use 5277");
        diag.error(FieldPath::new("editor.tab_width"), "must be 1..=8");

        let err = diag.into_result().unwrap_err();
        assert_eq!(err.len(), 2);
        let text = err.to_string();
        assert!(text.contains("2 problems"));
        assert!(text.contains("serve.port"));
        assert!(text.contains("use 5277"));
        assert!(text.contains("editor.tab_width"));
    }
}
