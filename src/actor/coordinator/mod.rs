//! Actor Coordinator - Wires up the Live Preview Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Mounts the browser render target
//! - Wires up actors and the render scheduler
//! - Runs them concurrently
//!
//! ```text
//! FsActor ──→ SessionActor ──→ BufferStore ──→ RenderScheduler ──→ PreviewSandbox
//!                  ↑                                                     │
//!               WsActor ←────────────────── ChannelTarget ───────────────┘
//! ```

mod runtime;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::{SessionMsg, WsMsg};
use super::session::SessionActor;
use super::ws::WsActor;
use crate::sandbox::ChannelTarget;
use crate::scheduler::RenderScheduler;
use crate::session::Session;

pub(crate) const CHANNEL_BUFFER: usize = 32;

/// WebSocket side of the actor system, created by the caller so the port is
/// known before the host page is served.
pub struct WsChannel {
    pub tx: mpsc::Sender<WsMsg>,
    pub rx: mpsc::Receiver<WsMsg>,
}

impl WsChannel {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER);
        Self { tx, rx }
    }
}

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    session: Arc<Session>,
    scheduler: Arc<RenderScheduler>,
    debounce: Duration,
    ws: Option<WsChannel>,
    watch: bool,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn new(session: Arc<Session>, scheduler: Arc<RenderScheduler>) -> Self {
        Self {
            session,
            scheduler,
            debounce: Duration::ZERO,
            ws: None,
            watch: false,
            shutdown_rx: None,
        }
    }

    /// Push documents to browsers through this channel.
    pub fn with_ws(mut self, channel: WsChannel) -> Self {
        self.ws = Some(channel);
        self
    }

    /// Mirror workspace file changes (requires a session workspace).
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    /// Extra settle delay before each render.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(mut self) -> Result<()> {
        let (session_tx, session_rx) = mpsc::channel::<SessionMsg>(CHANNEL_BUFFER);

        let (ws_actor, ws_tx) = match self.ws.take() {
            Some(WsChannel { tx, rx }) => {
                self.session
                    .sandbox()
                    .mount(Box::new(ChannelTarget::new(tx.clone())));
                let actor = WsActor::new(rx, session_tx.clone(), Arc::clone(&self.session));
                (Some(actor), Some(tx))
            }
            None => (None, None),
        };

        let fs_actor = match (self.watch, self.session.workspace()) {
            (true, Some(workspace)) => Some(
                FsActor::new(workspace.root(), session_tx.clone())
                    .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?,
            ),
            _ => None,
        };

        let session_actor =
            SessionActor::new(session_rx, ws_tx.clone(), Arc::clone(&self.session));

        self.scheduler.attach();
        // First render of whatever the buffers hold at startup
        self.scheduler.request();

        crate::debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        runtime::run_actors(
            runtime::Actors {
                fs: fs_actor,
                session: session_actor,
                ws: ws_actor,
            },
            Arc::clone(&self.scheduler),
            self.debounce,
            runtime::Senders {
                session: session_tx,
                ws: ws_tx,
            },
            shutdown_rx,
        )
        .await;

        self.scheduler.detach();
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}

impl Default for WsChannel {
    fn default() -> Self {
        Self::new()
    }
}
