//! `[exercises]` section configuration.
//!
//! ```toml
//! [exercises]
//! dir = "exercises"   # Optional directory of *.json exercises (relative to root)
//! default = "demo"    # Exercise loaded when nothing else is requested
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::exercise::DEMO_ID;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExercisesConfig {
    pub dir: Option<PathBuf>,
    pub default: String,
}

impl ExercisesConfig {
    const DIR: FieldPath = FieldPath::new("exercises.dir");
    const DEFAULT: FieldPath = FieldPath::new("exercises.default");

    /// Resolve `dir` against the project root.
    pub fn normalize(&mut self, root: &Path) {
        if let Some(dir) = self.dir.take() {
            self.dir = Some(crate::utils::path::normalize_path(&root.join(dir)));
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(dir) = &self.dir
            && !dir.is_dir()
        {
            diag.error_with_hint(
                Self::DIR,
                format!("`{}` is not a directory", dir.display()),
                "create it or remove `exercises.dir`",
            );
        }
        if self.default.trim().is_empty() {
            diag.error(Self::DEFAULT, "must not be empty");
        }
    }
}

impl Default for ExercisesConfig {
    fn default() -> Self {
        Self {
            dir: None,
            default: DEMO_ID.to_string(),
        }
    }
}
