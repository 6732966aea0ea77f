//! `[editor]` section configuration.
//!
//! ```toml
//! [editor]
//! tab_width = 2     # Spaces inserted by Tab (1..=8)
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::editor::DEFAULT_TAB_WIDTH;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub tab_width: u8,
}

impl EditorConfig {
    const TAB_WIDTH: FieldPath = FieldPath::new("editor.tab_width");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(1..=8).contains(&self.tab_width) {
            diag.error(
                Self::TAB_WIDTH,
                format!("must be between 1 and 8, got {}", self.tab_width),
            );
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}
