//! WebSocket Server for the Preview Channel
//!
//! Accepts host page connections and hands the raw streams to WsActor,
//! which performs the handshake and owns the clients from then on.

use std::net::{IpAddr, TcpListener};

use anyhow::Result;

use crate::actor::messages::WsMsg;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Start the WebSocket acceptor thread.
///
/// Binds `interface:base_port`, trying the next ports when taken, and
/// returns the port actually bound.
pub fn start_ws_server_with_channel(
    interface: IpAddr,
    base_port: u16,
    ws_tx: tokio::sync::mpsc::Sender<WsMsg>,
) -> Result<u16> {
    let (listener, actual_port) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
    listener.set_nonblocking(true)?;

    std::thread::spawn(move || {
        loop {
            match listener.accept() {
                Ok((stream, addr)) => {
                    crate::debug!("ws"; "client connected: {}", addr);

                    // Handshake and frame IO are blocking
                    let _ = stream.set_nonblocking(false);

                    if ws_tx.blocking_send(WsMsg::AddClient(stream)).is_err() {
                        crate::debug!("ws"; "actor stopped, closing acceptor");
                        break;
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    if ws_tx.is_closed() {
                        break;
                    }
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
                Err(e) => {
                    crate::log!("ws"; "accept error: {}", e);
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
        }
    });

    Ok(actual_port)
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(
    interface: IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind((interface, port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind WebSocket server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_bind_retries_next_port() {
        let localhost = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let (first, port) = try_bind_port(localhost, 0, 1).unwrap();
        assert_ne!(port, 0);

        // The taken port is skipped
        let (_second, next) = try_bind_port(localhost, port, 5).unwrap();
        assert_ne!(next, port);
        drop(first);
    }
}
