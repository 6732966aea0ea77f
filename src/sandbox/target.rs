//! Render targets: where composed documents end up.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tokio::sync::mpsc;

use crate::actor::messages::WsMsg;

/// The isolated rendering surface a [`PreviewSandbox`](super::PreviewSandbox)
/// writes into.
///
/// Every `write` is a full replacement of the previous document.
pub trait RenderTarget: Send {
    fn write(&mut self, document: &Arc<str>) -> Result<()>;

    fn set_fullscreen(&mut self, enabled: bool) -> Result<()>;

    /// Short name for log lines.
    fn describe(&self) -> String;
}

// ============================================================================
// ChannelTarget
// ============================================================================

/// Forwards documents to the WebSocket actor, which pushes them to every
/// connected host page.
pub struct ChannelTarget {
    tx: mpsc::Sender<WsMsg>,
}

impl ChannelTarget {
    pub fn new(tx: mpsc::Sender<WsMsg>) -> Self {
        Self { tx }
    }

    fn send(&self, msg: WsMsg) -> Result<()> {
        // Called from inside the runtime, so never block here
        self.tx.try_send(msg).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => anyhow!("websocket queue is full"),
            mpsc::error::TrySendError::Closed(_) => anyhow!("websocket actor stopped"),
        })
    }
}

impl RenderTarget for ChannelTarget {
    fn write(&mut self, document: &Arc<str>) -> Result<()> {
        self.send(WsMsg::Render(Arc::clone(document)))
    }

    fn set_fullscreen(&mut self, enabled: bool) -> Result<()> {
        self.send(WsMsg::Fullscreen(enabled))
    }

    fn describe(&self) -> String {
        "websocket".to_string()
    }
}

// ============================================================================
// FileTarget
// ============================================================================

/// Writes each document to a file, atomically (temp file + rename), so a
/// browser reloading the file never sees a half-written document.
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "preview.html".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

impl RenderTarget for FileTarget {
    fn write(&mut self, document: &Arc<str>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let temp = self.temp_path();
        fs::write(&temp, document.as_bytes())
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        fs::rename(&temp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }

    fn set_fullscreen(&mut self, _enabled: bool) -> Result<()> {
        // A file has no display mode
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ============================================================================
// Test support
// ============================================================================

/// Target that records everything written to it.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct RecordingTarget {
    pub documents: Arc<parking_lot::Mutex<Vec<String>>>,
    pub fullscreen: Arc<parking_lot::Mutex<Vec<bool>>>,
}

#[cfg(test)]
impl RecordingTarget {
    pub fn documents(&self) -> Vec<String> {
        self.documents.lock().clone()
    }
}

#[cfg(test)]
impl RenderTarget for RecordingTarget {
    fn write(&mut self, document: &Arc<str>) -> Result<()> {
        self.documents.lock().push(document.to_string());
        Ok(())
    }

    fn set_fullscreen(&mut self, enabled: bool) -> Result<()> {
        self.fullscreen.lock().push(enabled);
        Ok(())
    }

    fn describe(&self) -> String {
        "recording".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_target_replaces_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out/preview.html");
        let mut target = FileTarget::new(&path);

        target.write(&Arc::from("<p>one</p>")).unwrap();
        target.write(&Arc::from("<p>two</p>")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>two</p>");
        assert!(!temp.path().join("out/.preview.html.tmp").exists());
    }

    #[test]
    fn test_channel_target_forwards_messages() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut target = ChannelTarget::new(tx);

        target.write(&Arc::from("<p>x</p>")).unwrap();
        target.set_fullscreen(true).unwrap();

        assert!(matches!(rx.try_recv(), Ok(WsMsg::Render(doc)) if &*doc == "<p>x</p>"));
        assert!(matches!(rx.try_recv(), Ok(WsMsg::Fullscreen(true))));
    }

    #[test]
    fn test_channel_target_reports_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut target = ChannelTarget::new(tx);
        assert!(target.write(&Arc::from("x")).is_err());
    }
}
