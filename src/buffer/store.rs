//! Shared buffer store with change subscription.
//!
//! Listeners are called after the internal locks are released, so a listener
//! may read the store or even mutate it again without deadlocking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::{BufferKind, Snapshot};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A single buffer was edited.
    Buffer(BufferKind),
    /// All three buffers were replaced at once (exercise / workspace load).
    Loaded,
}

type Listener = dyn Fn(Change, &Snapshot) + Send + Sync;
type Listeners = Mutex<Vec<(u64, Arc<Listener>)>>;

/// Owner of the markup/style/script trio.
pub struct BufferStore {
    buffers: Mutex<Snapshot>,
    listeners: Arc<Listeners>,
    next_id: AtomicU64,
}

impl Default for BufferStore {
    fn default() -> Self {
        Self::new(Snapshot::default())
    }
}

impl BufferStore {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            buffers: Mutex::new(initial),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Current text of one buffer.
    pub fn get(&self, kind: BufferKind) -> String {
        self.buffers.lock().get(kind).to_owned()
    }

    /// Copy of all three buffers.
    pub fn snapshot(&self) -> Snapshot {
        self.buffers.lock().clone()
    }

    /// Replace one buffer.
    ///
    /// Returns `false` without notifying when the text is unchanged.
    pub fn set(&self, kind: BufferKind, text: impl Into<String>) -> bool {
        let text = text.into();
        let snapshot = {
            let mut buffers = self.buffers.lock();
            let slot = buffers.slot_mut(kind);
            if *slot == text {
                return false;
            }
            *slot = text;
            buffers.clone()
        };

        crate::debug!("buffer"; "{} updated ({} bytes)", kind, snapshot.get(kind).len());
        self.notify(Change::Buffer(kind), &snapshot);
        true
    }

    /// Replace all three buffers atomically with a single notification.
    pub fn load(&self, snapshot: Snapshot) {
        {
            let mut buffers = self.buffers.lock();
            *buffers = snapshot.clone();
        }
        crate::debug!("buffer"; "loaded {} bytes", snapshot.len());
        self.notify(Change::Loaded, &snapshot);
    }

    /// Register a change listener.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped or explicitly unsubscribed.
    #[must_use = "dropping the subscription removes the listener"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Change, &Snapshot) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    fn notify(&self, change: Change, snapshot: &Snapshot) {
        // Clone out so listeners run without the registry lock held
        let listeners: Vec<Arc<Listener>> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(change, snapshot);
        }
    }
}

// ============================================================================
// Subscription
// ============================================================================

/// Handle returned by [`BufferStore::subscribe`].
pub struct Subscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
