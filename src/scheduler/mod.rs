//! Coalescing render scheduler.
//!
//! A two-state machine between the buffer store and the sandbox:
//!
//! ```text
//!            request()                      run_pending()
//!   Idle ───────────────→ Pending ─────────────────────────→ Idle
//!                          │  ↺ request() absorbed           │
//!                          │                                 └─ snapshot → compose → render
//! ```
//!
//! The driver ([`RenderScheduler::run`]) yields once, and optionally sleeps a
//! debounce, before executing, so a synchronous burst of edits produces a
//! single render of the final state. Execution flips back to `Idle` before
//! reading the snapshot: a mutation racing with composition schedules another
//! pass instead of being lost.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::buffer::{BufferStore, Change, Subscription};
use crate::compose::ComposeOptions;
use crate::debug;
use crate::logger::status_success;
use crate::sandbox::PreviewSandbox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Pending,
}

/// Recomposes and renders the freshest snapshot, at most once per burst.
pub struct RenderScheduler {
    store: Arc<BufferStore>,
    sandbox: Arc<PreviewSandbox>,
    options: ComposeOptions,
    pending: AtomicBool,
    wake: Notify,
    renders: AtomicU64,
    subscription: Mutex<Option<Subscription>>,
}

impl RenderScheduler {
    pub fn new(
        store: Arc<BufferStore>,
        sandbox: Arc<PreviewSandbox>,
        options: ComposeOptions,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            sandbox,
            options,
            pending: AtomicBool::new(false),
            wake: Notify::new(),
            renders: AtomicU64::new(0),
            subscription: Mutex::new(None),
        })
    }

    /// Ask for a render. Returns `false` when one was already pending.
    pub fn request(&self) -> bool {
        if self.pending.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.wake.notify_one();
        true
    }

    pub fn state(&self) -> SchedulerState {
        if self.pending.load(Ordering::Acquire) {
            SchedulerState::Pending
        } else {
            SchedulerState::Idle
        }
    }

    /// Execute the pending render, if any. Returns whether a pass ran.
    pub fn run_pending(&self) -> bool {
        if !self.pending.swap(false, Ordering::AcqRel) {
            return false;
        }

        let snapshot = self.store.snapshot();
        let document = self.options.compose(&snapshot);
        let size = document.len();
        let rendered = self.sandbox.render(document);

        let pass = self.renders.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("render"; "pass #{} ({} bytes of source)", pass, snapshot.len());
        if rendered {
            status_success(&format!("rendered preview ({size} bytes)"));
        }
        true
    }

    /// Request a render on every store change.
    ///
    /// The listener only holds a weak reference, so the store never keeps
    /// the scheduler alive.
    pub fn attach(self: &Arc<Self>) {
        let scheduler = Arc::downgrade(self);
        let subscription = self.store.subscribe(move |change: Change, _| {
            let Some(scheduler) = scheduler.upgrade() else {
                return;
            };
            if scheduler.request() {
                match change {
                    Change::Buffer(kind) => debug!("render"; "scheduled by {} edit", kind),
                    Change::Loaded => debug!("render"; "scheduled by load"),
                }
            }
        });
        *self.subscription.lock() = Some(subscription);
    }

    /// Stop listening to the store.
    pub fn detach(&self) {
        self.subscription.lock().take();
    }

    /// Driver loop. Runs until the task is dropped or aborted.
    pub async fn run(self: Arc<Self>, debounce: Duration) {
        loop {
            self.wake.notified().await;

            // Let the rest of a synchronous burst land first
            tokio::task::yield_now().await;
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
            }

            self.run_pending();
        }
    }

    /// Number of executed passes.
    pub fn renders(&self) -> u64 {
        self.renders.load(Ordering::Relaxed)
    }
}

// ============================================================================
// Tests
// ============================================================================
