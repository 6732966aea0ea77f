//! Source buffers for the live preview.
//!
//! Exactly three buffers exist at all times, one per [`BufferKind`]:
//!
//! | Kind     | File         | Editor language |
//! |----------|--------------|-----------------|
//! | `Markup` | `index.html` | HTML            |
//! | `Style`  | `style.css`  | CSS             |
//! | `Script` | `script.js`  | JavaScript      |
//!
//! The trio is modeled as a [`Snapshot`] with one field per kind, so a missing
//! or duplicated kind is unrepresentable. [`BufferStore`] is the shared mutable
//! owner; everything else reads snapshots.

mod store;

pub use store::{BufferStore, Change, Subscription};

use std::path::Path;

use serde::{Deserialize, Serialize};

// ============================================================================
// BufferKind
// ============================================================================

/// Which of the three editable sources a buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferKind {
    #[serde(alias = "html")]
    Markup,
    #[serde(alias = "css")]
    Style,
    #[serde(alias = "js")]
    Script,
}

impl BufferKind {
    /// All kinds in editor tab order.
    pub const ALL: [Self; 3] = [Self::Markup, Self::Style, Self::Script];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Style => "style",
            Self::Script => "script",
        }
    }

    /// Workspace file backing this buffer.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Markup => "index.html",
            Self::Style => "style.css",
            Self::Script => "script.js",
        }
    }

    /// Map a workspace file back to its buffer kind (by file name only).
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        Self::ALL.into_iter().find(|kind| kind.file_name() == name)
    }
}

impl std::fmt::Display for BufferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Full copy of all three buffers at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub markup: String,
    pub style: String,
    pub script: String,
}

impl Snapshot {
    pub fn new(
        markup: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            style: style.into(),
            script: script.into(),
        }
    }

    pub fn get(&self, kind: BufferKind) -> &str {
        match kind {
            BufferKind::Markup => &self.markup,
            BufferKind::Style => &self.style,
            BufferKind::Script => &self.script,
        }
    }

    pub(crate) fn slot_mut(&mut self, kind: BufferKind) -> &mut String {
        match kind {
            BufferKind::Markup => &mut self.markup,
            BufferKind::Style => &mut self.style,
            BufferKind::Script => &mut self.script,
        }
    }

    /// Total size of all buffers in bytes.
    pub fn len(&self) -> usize {
        self.markup.len() + self.style.len() + self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Tests
// ============================================================================
