//! `compose` command: produce the preview document without a browser.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel;

use super::common::{Pipeline, load_catalog, resolve_exercise, seed_snapshot, workspace_for};
use super::serve::lifecycle::run_actor_system;
use crate::actor::Coordinator;
use crate::compose::ComposeOptions;
use crate::config::cfg;
use crate::log;
use crate::sandbox::{FileTarget, RenderTarget};

/// Compose once, or keep recomposing into `output` while `watch` is set.
pub fn compose(
    dir: Option<&Path>,
    exercise: Option<&str>,
    output: Option<&Path>,
    watch: bool,
) -> Result<()> {
    let config = cfg();
    let catalog = load_catalog(&config)?;
    let lesson = resolve_exercise(&catalog, exercise, &config)?;
    let workspace = dir.map(|dir| workspace_for(Some(dir)));
    let snapshot = seed_snapshot(&lesson, exercise.is_some(), workspace.as_ref())?;

    if !watch {
        let document = ComposeOptions::from_config(&config.preview).compose(&snapshot);
        return match output {
            Some(path) => {
                FileTarget::new(path).write(&Arc::from(document))?;
                log!("compose"; "wrote {}", path.display());
                Ok(())
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(document.as_bytes())
                    .context("failed to write document to stdout")?;
                Ok(())
            }
        };
    }

    // clap guarantees both for --watch
    let (Some(output), Some(workspace)) = (output, workspace) else {
        anyhow::bail!("--watch needs a workspace directory and an output file");
    };

    log!("watch"; "{} → {}", workspace.root().display(), output.display());
    let pipeline = Pipeline::new(&config, catalog, lesson, snapshot, Some(workspace));
    pipeline
        .session
        .sandbox()
        .mount(Box::new(FileTarget::new(output)));

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    crate::core::register_shutdown_signal(shutdown_tx);

    let coordinator = Coordinator::new(pipeline.session, pipeline.scheduler)
        .with_watch(true)
        .with_debounce(config.preview.debounce())
        .with_shutdown_signal(shutdown_rx);
    run_actor_system(coordinator);
    Ok(())
}
