//! FileSystem Actor
//!
//! Watches the workspace directory and sends debounced changes to the
//! SessionActor, which mirrors them into the buffers.
//!
//! Architecture:
//! ```text
//! Watcher → Debouncer (pure timing) → SessionMsg::FilesChanged
//! ```

use std::path::Path;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::messages::SessionMsg;

// Pure timing and deduplication.
mod debouncer;
// Shared fs event types.
mod types;


use debouncer::Debouncer;

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// Channel to send changes to SessionActor
    session_tx: mpsc::Sender<SessionMsg>,
    /// Debouncer state
    debouncer: Debouncer,
}

impl FsActor {
    /// Start watching `root` immediately.
    ///
    /// Events are buffered from here on, so nothing written between startup
    /// and `run` is lost.
    pub fn new(root: &Path, session_tx: mpsc::Sender<SessionMsg>) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;
        watcher.watch(root, RecursiveMode::NonRecursive)?;
        crate::debug!("watch"; "watching {}", root.display());

        Ok(Self {
            notify_rx,
            watcher,
            session_tx,
            debouncer: Debouncer::new(),
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let session_tx = self.session_tx;
        let mut debouncer = self.debouncer;
        // Dropping the watcher stops notifications
        let _watcher = self.watcher;

        let (async_tx, mut async_rx) = tokio::sync::mpsc::channel::<notify::Event>(64);

        // notify is sync-only: bridge its events into the runtime
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    if process_changes(&mut debouncer, &session_tx).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Deliver debounced changes.
///
/// Returns `Err(())` if SessionActor shut down
async fn process_changes(
    debouncer: &mut Debouncer,
    session_tx: &mpsc::Sender<SessionMsg>,
) -> Result<(), ()> {
    if crate::core::is_shutdown() {
        return Err(());
    }

    let Some(events) = debouncer.take_if_ready() else {
        return Ok(());
    };

    for line in events.describe() {
        crate::debug!("watch"; "{}", line);
    }

    session_tx
        .send(SessionMsg::FilesChanged(events.paths()))
        .await
        .map_err(|_| ())
}
