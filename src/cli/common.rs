//! Common utilities shared across CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::buffer::{BufferStore, Snapshot};
use crate::compose::ComposeOptions;
use crate::config::PlaygroundConfig;
use crate::exercise::{Catalog, Exercise};
use crate::sandbox::PreviewSandbox;
use crate::scheduler::RenderScheduler;
use crate::session::Session;
use crate::utils::path::normalize_path;
use crate::workspace::Workspace;
use crate::{debug, log};

/// Built-in exercises plus the configured exercise directory.
pub fn load_catalog(config: &PlaygroundConfig) -> Result<Catalog> {
    let Some(dir) = &config.exercises.dir else {
        return Ok(Catalog::builtin());
    };
    let catalog = Catalog::from_dir(dir)
        .with_context(|| format!("failed to load exercises from {}", dir.display()))?;
    debug!("exercise"; "{} exercises in catalog", catalog.len());
    Ok(catalog)
}

/// The requested exercise, else the configured default, falling back to the
/// demo lesson for unknown ids.
pub fn resolve_exercise(
    catalog: &Catalog,
    requested: Option<&str>,
    config: &PlaygroundConfig,
) -> Result<Exercise> {
    let id = requested.unwrap_or(&config.exercises.default);
    Ok(catalog.resolve(id)?.clone())
}

/// Workspace for a command's `DIR` argument (cwd when omitted).
pub fn workspace_for(dir: Option<&Path>) -> Workspace {
    let dir = dir.map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Workspace::new(normalize_path(&dir))
}

/// Initial buffer contents.
///
/// An explicitly requested exercise wins, then an initialized workspace,
/// then the default exercise.
pub fn seed_snapshot(
    exercise: &Exercise,
    explicit: bool,
    workspace: Option<&Workspace>,
) -> Result<Snapshot> {
    match workspace {
        Some(workspace) if !explicit && workspace.is_initialized() => {
            log!("workspace"; "editing files in {}", workspace.root().display());
            Ok(workspace.read_snapshot()?)
        }
        _ => Ok(exercise.snapshot()),
    }
}

/// Everything the preview pipeline needs, wired together.
pub struct Pipeline {
    pub session: Arc<Session>,
    pub scheduler: Arc<RenderScheduler>,
}

impl Pipeline {
    pub fn new(
        config: &PlaygroundConfig,
        catalog: Catalog,
        exercise: Exercise,
        snapshot: Snapshot,
        workspace: Option<Workspace>,
    ) -> Self {
        let store = Arc::new(BufferStore::new(snapshot));
        let sandbox = Arc::new(PreviewSandbox::new(config.preview.sandbox));
        let scheduler = RenderScheduler::new(
            Arc::clone(&store),
            Arc::clone(&sandbox),
            ComposeOptions::from_config(&config.preview),
        );

        let mut session = Session::new(store, sandbox, catalog, exercise, config.editor.tab_width);
        if let Some(workspace) = workspace {
            session = session.with_workspace(workspace);
        }

        Self {
            session: Arc::new(session),
            scheduler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferKind;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_exercise_prefers_request() {
        let config = PlaygroundConfig::default();
        let catalog = Catalog::builtin();

        let exercise = resolve_exercise(&catalog, Some("html-basics"), &config).unwrap();
        assert_eq!(exercise.id, "html-basics");

        let exercise = resolve_exercise(&catalog, None, &config).unwrap();
        assert_eq!(exercise.id, "demo");
    }

    #[test]
    fn test_seed_prefers_initialized_workspace() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::new(temp.path());
        workspace
            .write_snapshot(&Snapshot::new("<p>mine</p>", "", ""), false)
            .unwrap();

        let catalog = Catalog::builtin();
        let exercise = catalog.get("demo").cloned().unwrap();

        let seeded = seed_snapshot(&exercise, false, Some(&workspace)).unwrap();
        assert_eq!(seeded.get(BufferKind::Markup), "<p>mine</p>");

        // An explicit exercise overrides workspace files
        let seeded = seed_snapshot(&exercise, true, Some(&workspace)).unwrap();
        assert_eq!(seeded, exercise.snapshot());
    }

    #[test]
    fn test_seed_empty_workspace_uses_exercise() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::new(temp.path());
        let exercise = Catalog::builtin().get("html-basics").cloned().unwrap();

        let seeded = seed_snapshot(&exercise, false, Some(&workspace)).unwrap();
        assert_eq!(seeded, exercise.snapshot());
    }

    #[test]
    fn test_load_catalog_from_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("flex.json"),
            r#"{"id":"flex","title":"Flexbox","starterCode":{"html":"<div></div>"}}"#,
        )
        .unwrap();

        let mut config = PlaygroundConfig::default();
        config.exercises.dir = Some(temp.path().to_path_buf());
        let catalog = load_catalog(&config).unwrap();
        assert!(catalog.get("flex").is_some());
        assert!(catalog.get("demo").is_some());
    }
}
