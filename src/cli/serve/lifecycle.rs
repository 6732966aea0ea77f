//! Server lifecycle management.

use crate::{
    actor::{Coordinator, WsChannel},
    cli::common::Pipeline,
    config::PlaygroundConfig,
    log,
};
use anyhow::Result;
use crossbeam::channel::Receiver;
use std::{
    net::SocketAddr,
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Polls of [`wait_for_shutdown`] before giving up on the actor thread.
const SHUTDOWN_POLLS: u32 = 40;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(
    interface: std::net::IpAddr,
    base_port: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(anyhow::anyhow!(
        "failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Spawn the actor system on its own tokio runtime.
pub fn spawn_actors(
    pipeline: Pipeline,
    ws: WsChannel,
    config: Arc<PlaygroundConfig>,
    shutdown_rx: Receiver<()>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let coordinator = Coordinator::new(pipeline.session, pipeline.scheduler)
            .with_ws(ws)
            .with_watch(config.serve.watch)
            .with_debounce(config.preview.debounce())
            .with_shutdown_signal(shutdown_rx);
        run_actor_system(coordinator);
    })
}

/// Block the current thread on a fresh multi-threaded runtime.
pub fn run_actor_system(coordinator: Coordinator) {
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            log!("actor"; "failed to create tokio runtime: {}", e);
            return;
        }
    };

    rt.block_on(async {
        if let Err(e) = coordinator.run().await {
            log!("actor"; "error: {:#}", e);
        }
    });
}

/// Wait for actor system to shutdown gracefully (max 2 seconds).
pub fn wait_for_shutdown(handle: JoinHandle<()>) {
    for _ in 0..SHUTDOWN_POLLS {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
}
