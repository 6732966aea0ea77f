//! WebSocket Actor - Bidirectional Communication
//!
//! This actor is responsible for:
//! - Managing host page connections
//! - Catching new clients up with the current session state
//! - Broadcasting documents and buffer updates to every client
//! - Forwarding client messages (edits, controls) to SessionActor
//!
//! # Architecture
//!
//! ```text
//! PreviewSandbox --[Render/Fullscreen]--> WsActor --[broadcast]--> Clients
//! SessionActor ----[Broadcast]----------↗    |                       |
//!       ^                                    |                       |
//!       +-----------[Client(msg)]------------+--------[edit/...]-----+
//! ```

mod client_io;
mod delivery;

use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;

use super::messages::{SessionMsg, WsMsg};
use crate::reload::message::PreviewMessage;
use crate::session::Session;

/// A registered WebSocket client
struct RegisteredClient {
    ws: WebSocket<TcpStream>,
    addr: Option<SocketAddr>,
}

/// WebSocket Actor - manages client connections and broadcasts
pub struct WsActor {
    /// Channel to receive messages
    rx: mpsc::Receiver<WsMsg>,
    /// Where client messages go
    session_tx: mpsc::Sender<SessionMsg>,
    /// Source of the greeting for new clients
    session: Arc<Session>,
    /// Connected clients (shared for broadcast + read threads)
    clients: Arc<Mutex<Vec<RegisteredClient>>>,
    /// Stops the reader thread
    stopped: Arc<AtomicBool>,
}

impl WsActor {
    pub fn new(
        rx: mpsc::Receiver<WsMsg>,
        session_tx: mpsc::Sender<SessionMsg>,
        session: Arc<Session>,
    ) -> Self {
        Self {
            rx,
            session_tx,
            session,
            clients: Arc::new(Mutex::new(Vec::new())),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        let clients = Arc::clone(&self.clients);
        let session_tx = self.session_tx.clone();
        let stopped = Arc::clone(&self.stopped);
        std::thread::spawn(move || {
            Self::client_reader_loop(clients, session_tx, stopped);
        });

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Render(document) => {
                    crate::debug!("ws"; "sending render ({} bytes)", document.len());
                    self.broadcast(&PreviewMessage::render(&document));
                }

                WsMsg::Fullscreen(enabled) => {
                    self.broadcast(&PreviewMessage::Fullscreen { enabled });
                }

                WsMsg::Broadcast(msg) => {
                    self.broadcast(&msg);
                }

                WsMsg::AddClient(stream) => {
                    self.add_client(stream);
                }

                WsMsg::Shutdown => {
                    crate::debug!("ws"; "shutting down");
                    self.close_all();
                    break;
                }
            }
        }

        self.stopped.store(true, Ordering::Release);
    }
}
