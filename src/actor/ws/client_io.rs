use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::protocol::Message;

use crate::actor::messages::SessionMsg;
use crate::reload::message::ClientMessage;

use super::{RegisteredClient, WsActor};

impl WsActor {
    /// Add a new client connection
    pub(super) fn add_client(&self, stream: TcpStream) {
        let addr = stream.peer_addr().ok();

        // Keep blocking mode during handshake, switch to non-blocking after
        match tungstenite::accept(stream) {
            Ok(mut ws) => {
                for msg in self.session.greeting() {
                    if let Err(e) = ws.send(Message::Text(msg.to_json().into())) {
                        crate::log!("ws"; "failed to greet client: {}", e);
                        return;
                    }
                }

                // Now set non-blocking for polling reads
                let _ = ws.get_ref().set_nonblocking(true);

                let mut clients = self.clients.lock();
                crate::debug!("ws"; "client connected (total: {}, addr: {:?})", clients.len() + 1, addr);
                clients.push(RegisteredClient { ws, addr });
            }
            Err(e) => {
                crate::log!("ws"; "handshake failed: {}", e);
            }
        }
    }

    /// Background thread to read client messages (non-blocking poll)
    pub(super) fn client_reader_loop(
        clients: Arc<Mutex<Vec<RegisteredClient>>>,
        session_tx: mpsc::Sender<SessionMsg>,
        stopped: Arc<AtomicBool>,
    ) {
        while !stopped.load(Ordering::Acquire) {
            std::thread::sleep(std::time::Duration::from_millis(100));

            let inbox = {
                let mut clients_guard = clients.lock();
                let (inbox, disconnected) = Self::poll_clients(&mut clients_guard);

                for i in disconnected.into_iter().rev() {
                    let client = clients_guard.remove(i);
                    crate::debug!("ws"; "client disconnected: {:?}", client.addr);
                }
                inbox
            };

            // Forward outside the lock so broadcasts never wait on a full
            // session queue
            for msg in inbox {
                if session_tx.blocking_send(SessionMsg::Client(msg)).is_err() {
                    return;
                }
            }
        }
    }

    /// Drain every readable frame. Returns parsed messages and the indices
    /// of clients that went away.
    fn poll_clients(clients: &mut [RegisteredClient]) -> (Vec<ClientMessage>, Vec<usize>) {
        let mut inbox = Vec::new();
        let mut disconnected = Vec::new();

        for (i, client) in clients.iter_mut().enumerate() {
            loop {
                match client.ws.read() {
                    Ok(Message::Text(text)) => match ClientMessage::from_json(text.as_str()) {
                        Some(msg) => inbox.push(msg),
                        None => crate::debug!("ws"; "ignoring message: {}", text.as_str()),
                    },
                    Ok(Message::Close(_)) => {
                        disconnected.push(i);
                        break;
                    }
                    Ok(_) => {}
                    Err(tungstenite::Error::Io(ref e))
                        if e.kind() == std::io::ErrorKind::WouldBlock =>
                    {
                        // No data available
                        break;
                    }
                    Err(_) => {
                        disconnected.push(i);
                        break;
                    }
                }
            }
        }

        (inbox, disconnected)
    }
}
