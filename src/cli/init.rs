//! `init` command: lay out a workspace from an exercise's starter code.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::common::{load_catalog, resolve_exercise, workspace_for};
use crate::buffer::BufferKind;
use crate::config::PlaygroundConfig;
use crate::log;

/// Default config written next to a fresh workspace.
const CONFIG_TEMPLATE: &str = r#"# techlearn playground configuration

[serve]
interface = "127.0.0.1"
port = 5277
watch = true

[preview]
title = "Preview"
reset = true
debounce_ms = 0

[preview.sandbox]
scripts = true
forms = true
popups = true
modals = true

[editor]
tab_width = 2

[exercises]
default = "demo"
"#;

/// Write the starter files (and a config file when none exists yet).
pub fn init_workspace(
    config: &PlaygroundConfig,
    dir: Option<&Path>,
    exercise: Option<&str>,
    force: bool,
) -> Result<()> {
    let catalog = load_catalog(config)?;
    let lesson = resolve_exercise(&catalog, exercise, config)?;
    let workspace = workspace_for(dir);

    workspace.write_snapshot(&lesson.snapshot(), force)?;
    for kind in BufferKind::ALL {
        log!("init"; "wrote {}", workspace.path(kind).display());
    }

    if !config.has_file() {
        let path = workspace.root().join("techlearn.toml");
        if !path.exists() {
            fs::write(&path, CONFIG_TEMPLATE)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log!("init"; "wrote {}", path.display());
        }
    }

    log!("init"; "workspace ready with `{}`, run `techlearn serve`", lesson.id);
    Ok(())
}
