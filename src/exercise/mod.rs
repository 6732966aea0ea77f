//! Exercises: read-only lesson data whose starter code seeds the buffers.
//!
//! Only `starter_code` reaches the preview pipeline. The remaining fields are
//! shown by the host page (title bar, theory panel).

mod catalog;

pub use catalog::{Catalog, DEMO_ID};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::Snapshot;

// ============================================================================
// Exercise
// ============================================================================

/// One lesson, in the camelCase shape exercise JSON files use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Theory panel markup. Rendered in a fully locked frame.
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub technology: String,
    #[serde(default)]
    pub starter_code: StarterCode,
}

impl Exercise {
    /// Buffer contents this exercise starts from.
    pub fn snapshot(&self) -> Snapshot {
        self.starter_code.clone().into()
    }
}

/// Initial source of the three buffers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarterCode {
    pub html: String,
    pub css: String,
    pub js: String,
}

impl From<StarterCode> for Snapshot {
    fn from(code: StarterCode) -> Self {
        Snapshot::new(code.html, code.css, code.js)
    }
}

impl From<&Snapshot> for StarterCode {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            html: snapshot.markup.clone(),
            css: snapshot.style.clone(),
            js: snapshot.script.clone(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

#[derive(Debug, Error)]
pub enum ExerciseError {
    #[error("exercise `{0}` not found")]
    NotFound(String),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid exercise file `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("invalid exercise file `{0}`: {1}")]
    Invalid(PathBuf, String),
}

/// Source of exercises by id.
pub trait ExerciseLoader {
    fn load(&self, id: &str) -> Result<Exercise, ExerciseError>;
}

impl ExerciseLoader for Catalog {
    fn load(&self, id: &str) -> Result<Exercise, ExerciseError> {
        self.get(id)
            .cloned()
            .ok_or_else(|| ExerciseError::NotFound(id.to_string()))
    }
}
