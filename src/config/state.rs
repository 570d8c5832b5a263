// Application state module
// Shared read-only state handed to every connection task

use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::Config;
use crate::handler::StaticBundle;

/// Application state
pub struct AppState {
    pub config: Config,
    pub bundle: StaticBundle,

    /// Connections currently being served
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: Config, bundle: StaticBundle) -> Self {
        Self {
            config,
            bundle,
            active_connections: AtomicUsize::new(0),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }
}
