//! Navigation controller.
//!
//! Owns the history stack and the shared current-path cell. `navigate`
//! pushes a new entry, resets the scroll offset, and updates the cell;
//! `back`/`forward` replay existing entries without pushing (the
//! equivalent of browser history pops). Route re-evaluation is driven by
//! the path cell's subscriber notifications.
//!
//! Navigation is synchronous: no I/O happens here, only cell updates.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::shared::signal::Signal;

struct History {
    entries: Vec<String>,
    cursor: usize,
}

struct Inner {
    history: Mutex<History>,
    path: Signal<String>,
    scroll: Signal<u32>,
}

/// Cheaply cloneable handle on the application's navigation state.
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<Inner>,
}

impl Navigator {
    /// Create a navigator positioned on `initial` (usually `/`).
    pub fn new(initial: &str) -> Self {
        let path = normalize(initial);
        Self {
            inner: Arc::new(Inner {
                history: Mutex::new(History {
                    entries: vec![path.clone()],
                    cursor: 0,
                }),
                path: Signal::new(path),
                scroll: Signal::new(0),
            }),
        }
    }

    /// The shared current-path cell; subscribe to re-evaluate routes.
    pub fn path(&self) -> Signal<String> {
        self.inner.path.clone()
    }

    /// The viewport scroll offset cell, reset to 0 on navigation.
    pub fn scroll(&self) -> Signal<u32> {
        self.inner.scroll.clone()
    }

    pub fn current(&self) -> String {
        self.inner.path.get()
    }

    /// Push a new history entry and move to it. Forward entries beyond the
    /// current position are discarded, as a browser would.
    pub fn navigate(&self, to: &str) {
        let path = normalize(to);
        debug!(%path, "navigate");
        {
            let mut history = self.inner.history.lock();
            let cursor = history.cursor;
            history.entries.truncate(cursor + 1);
            history.entries.push(path.clone());
            history.cursor += 1;
        }
        self.inner.scroll.set(0);
        self.inner.path.set(path);
    }

    /// Record the viewport scroll position reported by the UI.
    pub fn set_scroll(&self, offset: u32) {
        self.inner.scroll.set(offset);
    }

    /// Move one entry back, updating the path cell without pushing.
    /// Returns false at the start of history.
    pub fn back(&self) -> bool {
        let path = {
            let mut history = self.inner.history.lock();
            if history.cursor == 0 {
                return false;
            }
            history.cursor -= 1;
            history.entries[history.cursor].clone()
        };
        self.inner.path.set(path);
        true
    }

    /// Move one entry forward; counterpart of [`back`](Navigator::back).
    pub fn forward(&self) -> bool {
        let path = {
            let mut history = self.inner.history.lock();
            if history.cursor + 1 >= history.entries.len() {
                return false;
            }
            history.cursor += 1;
            history.entries[history.cursor].clone()
        };
        self.inner.path.set(path);
        true
    }
}

/// Reduce a navigation target to its path: query and fragment are dropped
/// and a leading `/` is guaranteed.
fn normalize(to: &str) -> String {
    let path = to.split(['?', '#']).next().unwrap_or_default();
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
