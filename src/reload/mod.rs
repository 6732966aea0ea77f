//! Live preview channel.
//!
//! - `message`: JSON wire protocol between the host page and the server
//! - `server`: WebSocket acceptor feeding WsActor

pub mod message;
pub mod server;
