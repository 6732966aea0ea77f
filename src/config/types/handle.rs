//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads from any thread (request handlers,
//! actors).

use crate::config::PlaygroundConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<PlaygroundConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(PlaygroundConfig::default()));

#[inline]
pub fn cfg() -> Arc<PlaygroundConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: PlaygroundConfig) -> Arc<PlaygroundConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
