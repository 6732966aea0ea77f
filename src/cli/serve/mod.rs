//! Playground server with live preview.
//!
//! The HTTP request loop runs on the main thread; the actor system (WebSocket,
//! watcher, session, render scheduler) runs on a tokio runtime in a
//! background thread.
//!
//! | Route                        | Response                                  |
//! |------------------------------|-------------------------------------------|
//! | `/`                          | Host page                                 |
//! | `/__techlearn/host.js`       | Host script (WebSocket port injected)     |
//! | `/__techlearn/exercises.json`| Exercise catalog summary                  |
//! | `/preview`                   | Latest document, with a CSP sandbox       |
//! | anything else                | Static file from the workspace            |

pub(crate) mod lifecycle;
mod path;
mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel;
use tiny_http::{Request, Server};

use super::common::{Pipeline, load_catalog, resolve_exercise, seed_snapshot, workspace_for};
use crate::actor::WsChannel;
use crate::config::cfg;
use crate::session::Session;
use crate::workspace::Workspace;
use crate::{debug, log};

/// Host script URL.
pub const HOST_JS_PATH: &str = "/__techlearn/host.js";
/// Catalog summary URL.
pub const EXERCISES_PATH: &str = "/__techlearn/exercises.json";
/// Standalone preview URL.
pub const PREVIEW_PATH: &str = "/preview";

/// Number of request handler threads.
const REQUEST_THREADS: usize = 4;

/// State shared by request handlers.
pub struct ServeState {
    session: Arc<Session>,
    workspace: Workspace,
    ws_port: u16,
}

/// Start the playground server (blocking).
pub fn serve(dir: Option<&std::path::Path>, exercise: Option<&str>) -> Result<()> {
    let config = cfg();

    let catalog = load_catalog(&config)?;
    let lesson = resolve_exercise(&catalog, exercise, &config)?;
    let workspace = workspace_for(dir);
    let snapshot = seed_snapshot(&lesson, exercise.is_some(), Some(&workspace))?;
    let pipeline = Pipeline::new(&config, catalog, lesson, snapshot, Some(workspace.clone()));

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    // The WebSocket channel exists before any request is served, so host.js
    // always carries the bound port
    let ws = WsChannel::new();
    let ws_port = crate::reload::server::start_ws_server_with_channel(
        config.serve.interface,
        addr.port().saturating_add(1),
        ws.tx.clone(),
    )
    .context("failed to start preview channel")?;
    debug!("ws"; "ws://{}:{}", config.serve.interface, ws_port);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    crate::core::register_server(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", display_addr(addr));
    if config.serve.watch {
        log!("watch"; "{}", workspace.root().display());
    }

    let state = Arc::new(ServeState {
        session: Arc::clone(&pipeline.session),
        workspace,
        ws_port,
    });

    let actors = lifecycle::spawn_actors(pipeline, ws, Arc::clone(&config), shutdown_rx);
    run_request_loop(&server, &state)?;
    lifecycle::wait_for_shutdown(actors);
    Ok(())
}

/// Loopback for unspecified interfaces, so the printed URL is clickable.
fn display_addr(addr: SocketAddr) -> SocketAddr {
    if addr.ip().is_unspecified() {
        SocketAddr::new(std::net::Ipv4Addr::LOCALHOST.into(), addr.port())
    } else {
        addr
    }
}

fn run_request_loop(server: &Server, state: &Arc<ServeState>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let state = Arc::clone(state);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &state) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, state: &ServeState) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let url = path::route_path(request.url());
    match url.as_str() {
        "/" | "/__techlearn" => {
            let config = cfg();
            response::respond_host(request, &config)
        }
        HOST_JS_PATH => response::respond_host_js(request, state.ws_port),
        EXERCISES_PATH => response::respond_exercises(request, &state.session),
        PREVIEW_PATH => response::respond_preview(request, &state.session),
        _ => match path::resolve_path(&url, state.workspace.root()) {
            Some(file) => response::respond_file(request, &file),
            None => response::respond_not_found(request),
        },
    }
}
