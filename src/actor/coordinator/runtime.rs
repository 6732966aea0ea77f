use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::fs::FsActor;
use crate::actor::messages::{SessionMsg, WsMsg};
use crate::actor::session::SessionActor;
use crate::actor::ws::WsActor;
use crate::scheduler::RenderScheduler;

pub(super) struct Actors {
    pub fs: Option<FsActor>,
    pub session: SessionActor,
    pub ws: Option<WsActor>,
}

pub(super) struct Senders {
    pub session: mpsc::Sender<SessionMsg>,
    pub ws: Option<mpsc::Sender<WsMsg>>,
}

/// Run all actors concurrently until shutdown.
pub(super) async fn run_actors(
    actors: Actors,
    scheduler: Arc<RenderScheduler>,
    debounce: Duration,
    senders: Senders,
    shutdown_rx: Option<Receiver<()>>,
) {
    let scheduler_handle = tokio::spawn(scheduler.run(debounce));
    let session_handle = tokio::spawn(actors.session.run());
    let ws_handle = actors.ws.map(|ws| tokio::spawn(ws.run()));
    let fs_handle = actors.fs.map(|fs| tokio::spawn(fs.run()));

    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    } else {
        // Without a signal, run for as long as the session does
        let _ = session_handle.await;
        scheduler_handle.abort();
        return;
    }

    crate::debug!("actor"; "sending shutdown");
    let _ = senders.session.send(SessionMsg::Shutdown).await;
    if let Some(ws_tx) = &senders.ws {
        let _ = ws_tx.send(WsMsg::Shutdown).await;
    }

    scheduler_handle.abort();
    if let Some(handle) = fs_handle {
        handle.abort();
    }

    let _ = tokio::time::timeout(Duration::from_millis(500), session_handle).await;
    if let Some(handle) = ws_handle {
        let _ = tokio::time::timeout(Duration::from_millis(500), handle).await;
    }
}
