//! HTTP response handlers.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::config::PlaygroundConfig;
use crate::embed::serve::{HOST_HTML, HOST_JS, HostHtmlVars, HostJsVars};
use crate::session::Session;
use crate::utils::mime::types::{HTML, JAVASCRIPT, JSON, PLAIN};

/// Entry of `/__techlearn/exercises.json`.
#[derive(Debug, Serialize)]
struct ExerciseSummary<'a> {
    id: &'a str,
    title: &'a str,
    difficulty: &'a str,
    technology: &'a str,
}

/// Respond with the host page.
pub fn respond_host(request: Request, config: &PlaygroundConfig) -> Result<()> {
    let body = HOST_HTML.render(&HostHtmlVars {
        title: &config.preview.title,
        version: env!("CARGO_PKG_VERSION"),
    });
    send_body(request, 200, HTML, body.into_bytes(), Vec::new())
}

/// Respond with host.js from memory.
pub fn respond_host_js(request: Request, ws_port: u16) -> Result<()> {
    let body = HOST_JS.render(&HostJsVars { ws_port });
    send_body(request, 200, JAVASCRIPT, body.into_bytes(), Vec::new())
}

/// Respond with a summary of the exercise catalog.
pub fn respond_exercises(request: Request, session: &Session) -> Result<()> {
    let summaries: Vec<_> = session
        .catalog()
        .iter()
        .map(|e| ExerciseSummary {
            id: &e.id,
            title: &e.title,
            difficulty: &e.difficulty,
            technology: &e.technology,
        })
        .collect();
    let body = serde_json::to_vec(&summaries)?;
    send_body(request, 200, JSON, body, Vec::new())
}

/// Respond with the latest rendered document, isolated by a CSP sandbox.
pub fn respond_preview(request: Request, session: &Session) -> Result<()> {
    let sandbox = session.sandbox();
    let Some(document) = sandbox.last_document() else {
        return send_body(
            request,
            503,
            PLAIN,
            b"preview not rendered yet".to_vec(),
            Vec::new(),
        );
    };
    let headers = vec![
        header("Content-Security-Policy", &sandbox.policy().to_csp())?,
        header("Referrer-Policy", "no-referrer")?,
        header("Cache-Control", "no-store")?,
    ];
    send_body(request, 200, HTML, document.as_bytes().to_vec(), headers)
}

/// Respond with a static workspace file.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = crate::utils::mime::from_path(path);
    if is_head_request(&request) {
        return send_body(request, 200, content_type, Vec::new(), file_headers()?);
    }
    let body = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body, file_headers()?)
}

/// Previews run in an opaque origin, so workspace files must be readable
/// from any origin for `fetch` in user script to reach them.
fn file_headers() -> Result<Vec<Header>> {
    Ok(vec![
        header("Cache-Control", "no-cache")?,
        header("Access-Control-Allow-Origin", "*")?,
    ])
}

pub fn respond_not_found(request: Request) -> Result<()> {
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec(), Vec::new())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(
        request,
        503,
        PLAIN,
        b"503 Service Unavailable".to_vec(),
        Vec::new(),
    )
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    extra: Vec<Header>,
) -> Result<()> {
    let mut response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(header("Content-Type", content_type)?);
    for h in extra {
        response = response.with_header(h);
    }
    request.respond(response)?;
    Ok(())
}

fn header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow::anyhow!("invalid header `{key}`"))
}
