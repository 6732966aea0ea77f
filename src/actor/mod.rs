//! Actor System for Live Preview
//!
//! Message-passing concurrency for the dev server:
//!
//! ```text
//! FsActor ──→ SessionActor ←── WsActor
//! (watch)      (mutate)        (browser)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - Workspace watcher with debouncing
//! - `session` - Applies client messages and file changes to the session
//! - `ws` - WebSocket clients and broadcast
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod session;
pub mod ws;

pub use coordinator::{Coordinator, WsChannel};
