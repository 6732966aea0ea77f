//! Preview sandbox.
//!
//! Owns the isolated rendering surface. Every render is a full replacement:
//! the host page swaps in a brand new iframe per document, so no timers,
//! listeners or history entries of the previous run survive.
//!
//! ```text
//! RenderScheduler ──render(doc)──→ PreviewSandbox ──write──→ dyn RenderTarget
//!                                        │                    ├─ ChannelTarget (browser)
//!     host page ──refresh/fullscreen─────┘                    └─ FileTarget (disk)
//! ```
//!
//! Target failures are logged and never reach the caller.

mod policy;
mod target;

pub use policy::SandboxPolicy;
pub use target::{ChannelTarget, FileTarget, RenderTarget};

#[cfg(test)]
pub use target::RecordingTarget;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::logger::status_error;
use crate::{debug, log};

/// The preview surface and its display state.
pub struct PreviewSandbox {
    policy: SandboxPolicy,
    state: Mutex<SandboxState>,
}

#[derive(Default)]
struct SandboxState {
    target: Option<Box<dyn RenderTarget>>,
    /// Last document actually handed to a target.
    last: Option<Arc<str>>,
    fullscreen: bool,
}

impl PreviewSandbox {
    pub fn new(policy: SandboxPolicy) -> Self {
        Self {
            policy,
            state: Mutex::new(SandboxState::default()),
        }
    }

    pub const fn policy(&self) -> SandboxPolicy {
        self.policy
    }

    /// Attach a rendering surface, replacing any previous one.
    pub fn mount(&self, target: Box<dyn RenderTarget>) {
        let mut state = self.state.lock();
        debug!("sandbox"; "mounted {}", target.describe());
        state.target = Some(target);
    }

    /// Detach the current surface.
    pub fn unmount(&self) -> Option<Box<dyn RenderTarget>> {
        self.state.lock().target.take()
    }

    pub fn is_mounted(&self) -> bool {
        self.state.lock().target.is_some()
    }

    /// Replace the preview with `document`.
    ///
    /// Without a mounted target this is a silent no-op and the document is
    /// not remembered; the next change renders again. Returns whether a
    /// target accepted the document.
    pub fn render(&self, document: impl Into<Arc<str>>) -> bool {
        let document = document.into();
        let mut state = self.state.lock();
        let Some(target) = state.target.as_mut() else {
            debug!("sandbox"; "render skipped: no target mounted");
            return false;
        };

        match target.write(&document) {
            Ok(()) => {
                debug!("sandbox"; "rendered {} bytes to {}", document.len(), target.describe());
                state.last = Some(document);
                true
            }
            Err(e) => {
                status_error(&format!("render to {} failed", target.describe()), &format!("{e:#}"));
                false
            }
        }
    }

    /// Re-render the last rendered document. No-op when nothing was rendered.
    pub fn refresh(&self) -> bool {
        let last = self.state.lock().last.clone();
        match last {
            Some(document) => self.render(document),
            None => {
                debug!("sandbox"; "refresh skipped: nothing rendered yet");
                false
            }
        }
    }

    /// Toggle the display mode and forward it to the target.
    pub fn set_fullscreen(&self, enabled: bool) {
        let mut state = self.state.lock();
        state.fullscreen = enabled;
        if let Some(target) = state.target.as_mut()
            && let Err(e) = target.set_fullscreen(enabled)
        {
            log!("sandbox"; "fullscreen toggle on {} failed: {:#}", target.describe(), e);
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.state.lock().fullscreen
    }

    /// Document currently shown by the target, if any.
    pub fn last_document(&self) -> Option<Arc<str>> {
        self.state.lock().last.clone()
    }
}

impl Default for PreviewSandbox {
    fn default() -> Self {
        Self::new(SandboxPolicy::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
