//! Request Generations
//!
//! In-flight requests are never cancelled by navigation, so a slow response
//! can arrive after a newer request for the same state cell has already
//! started. Each request takes a generation from the cell's counter and
//! checks it is still the latest before committing its result; stale
//! responses are discarded instead of overwriting newer state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonically increasing generation counter for one target state cell.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    latest: Arc<AtomicU64>,
}

/// A single request's generation ticket.
#[derive(Debug)]
pub struct Generation {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request generation, superseding all earlier ones.
    pub fn begin(&self) -> Generation {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Generation {
            id,
            latest: Arc::clone(&self.latest),
        }
    }
}

impl Generation {
    /// Whether no newer request has started since this one.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.id
    }
}
