//! Session Actor
//!
//! Serializes every mutation of the playground session: host page messages
//! from WsActor and workspace changes from FsActor. Replies are broadcast
//! through WsActor; renders happen on their own via the scheduler.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::messages::{SessionMsg, WsMsg};
use crate::reload::message::PreviewMessage;
use crate::session::Session;

pub struct SessionActor {
    rx: mpsc::Receiver<SessionMsg>,
    /// Absent when no browser is attached (`compose --watch`)
    ws_tx: Option<mpsc::Sender<WsMsg>>,
    session: Arc<Session>,
}

impl SessionActor {
    pub fn new(
        rx: mpsc::Receiver<SessionMsg>,
        ws_tx: Option<mpsc::Sender<WsMsg>>,
        session: Arc<Session>,
    ) -> Self {
        Self { rx, ws_tx, session }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            let replies = match msg {
                SessionMsg::Client(msg) => {
                    crate::debug!("session"; "client: {:?}", msg);
                    self.session.handle_client(msg)
                }
                SessionMsg::FilesChanged(paths) => self.session.files_changed(&paths),
                SessionMsg::Shutdown => {
                    crate::debug!("session"; "shutting down");
                    break;
                }
            };

            if self.send(replies).await.is_err() {
                break;
            }
        }
    }

    async fn send(&self, replies: Vec<PreviewMessage>) -> Result<(), ()> {
        let Some(ws_tx) = &self.ws_tx else {
            return Ok(());
        };
        for reply in replies {
            ws_tx.send(WsMsg::Broadcast(reply)).await.map_err(|_| ())?;
        }
        Ok(())
    }
}
