//! `[preview]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [preview]
//! title = "Preview"       # <title> of fragment documents
//! reset = true            # Baseline CSS reset in fragment documents
//! debounce_ms = 0         # Extra settle delay before a render (0 = next tick)
//!
//! [preview.sandbox]
//! scripts = true
//! forms = true
//! popups = true
//! modals = true
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::sandbox::SandboxPolicy;

/// Upper bound for `debounce_ms`.
const MAX_DEBOUNCE_MS: u64 = 5_000;

/// Preview pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub title: String,
    pub reset: bool,
    pub debounce_ms: u64,
    pub sandbox: SandboxPolicy,
}

impl PreviewConfig {
    const DEBOUNCE_MS: FieldPath = FieldPath::new("preview.debounce_ms");
    const SANDBOX_SCRIPTS: FieldPath = FieldPath::new("preview.sandbox.scripts");

    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            diag.error(
                Self::DEBOUNCE_MS,
                format!("must be at most {MAX_DEBOUNCE_MS}, got {}", self.debounce_ms),
            );
        }
        if !self.sandbox.scripts {
            diag.warn(
                Self::SANDBOX_SCRIPTS,
                "user scripts will not run in the preview",
            );
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            title: "Preview".to_string(),
            reset: true,
            debounce_ms: 0,
            sandbox: SandboxPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::test_parse_config;

    #[test]
    fn test_preview_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.preview.title, "Preview");
        assert!(config.preview.reset);
        assert_eq!(config.preview.debounce(), Duration::ZERO);
        assert!(config.preview.sandbox.scripts);
    }

    #[test]
    fn test_preview_sandbox_section() {
        let config = test_parse_config(
            "[preview]\ntitle = \"Lab\"\ndebounce_ms = 50\n[preview.sandbox]\npopups = false",
        );
        assert_eq!(config.preview.title, "Lab");
        assert_eq!(config.preview.debounce(), Duration::from_millis(50));
        assert!(!config.preview.sandbox.popups);
        assert!(config.preview.sandbox.forms);
    }
}
