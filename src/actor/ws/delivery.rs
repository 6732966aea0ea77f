use tungstenite::protocol::Message;

use crate::reload::message::PreviewMessage;

use super::WsActor;

impl WsActor {
    /// Broadcast a message to all connected clients
    pub(super) fn broadcast(&self, msg: &PreviewMessage) {
        let mut clients = self.clients.lock();
        let count = clients.len();

        if count == 0 {
            crate::debug!("ws"; "no clients connected");
            return;
        }

        let frame = Message::Text(msg.to_json().into());
        clients.retain_mut(|client| match client.ws.send(frame.clone()) {
            Ok(_) => true,
            // Frame stays queued in tungstenite and goes out with the next flush
            Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => true,
            Err(e) => {
                crate::debug!("ws"; "client disconnected: {}", e);
                false
            }
        });
        crate::debug!("ws"; "broadcast to {} clients", count);
    }

    /// Close every connection
    pub(super) fn close_all(&self) {
        let mut clients = self.clients.lock();
        for mut client in clients.drain(..) {
            let _ = client.ws.close(None);
        }
    }
}
