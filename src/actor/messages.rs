//! Actor Message Definitions
//!
//! Message types for inter-actor communication.
//!
//! ```text
//! FsActor ──FilesChanged──→ SessionActor ──(store)──→ RenderScheduler
//!                                ↑                          │
//! WsActor ──Client(msg)──────────┘                          ▼
//!    ↑                                                PreviewSandbox
//!    └──────────── Render / Fullscreen / Broadcast ─────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use crate::reload::message::{ClientMessage, PreviewMessage};

// =============================================================================
// SessionActor Messages
// =============================================================================

/// Messages to Session Actor
#[derive(Debug)]
pub enum SessionMsg {
    /// Message received from a host page
    Client(ClientMessage),
    /// Workspace files changed on disk
    FilesChanged(Vec<PathBuf>),
    /// Shutdown
    Shutdown,
}

// =============================================================================
// WsActor Messages
// =============================================================================

/// Messages to WebSocket Actor
#[derive(Debug)]
pub enum WsMsg {
    /// Push a freshly composed document to every client
    Render(Arc<str>),
    /// Toggle preview display mode on every client
    Fullscreen(bool),
    /// Send an arbitrary message to every client
    Broadcast(PreviewMessage),
    /// Add client
    AddClient(std::net::TcpStream),
    /// Shutdown
    Shutdown,
}
