//! Process lifecycle state.
//!
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)
//!
//! The HTTP server and the actor shutdown sender are registered once, so the
//! Ctrl+C handler can stop both gracefully.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crossbeam::channel::Sender;
use tiny_http::Server;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Shutdown signal sender for actor system
static SHUTDOWN_TX: OnceLock<Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on what has been registered:
/// - A server: unblock its request loop and notify actors
/// - Only an actor system (`compose --watch`): notify actors
/// - Nothing: exit immediately
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        let notified = SHUTDOWN_TX.get().is_some_and(|tx| tx.send(()).is_ok());

        if let Some(server) = SERVER.get() {
            crate::log!("serve"; "shutting down...");
            server.unblock();
        } else if !notified {
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the HTTP server for graceful shutdown
///
/// Call this after binding the server, before entering the request loop
pub fn register_server(server: Arc<Server>, shutdown_tx: Sender<()>) {
    let _ = SERVER.set(server);
    register_shutdown_signal(shutdown_tx);
}

/// Register an actor system without HTTP server
pub fn register_shutdown_signal(shutdown_tx: Sender<()>) {
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_shutdown_by_default() {
        assert!(!is_shutdown());
    }
}
