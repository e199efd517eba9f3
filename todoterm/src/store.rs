//! Observable container for [`ListState`].
//!
//! Each [`StateStore::update`] runs one closure against the state under the
//! channel's lock and then wakes every subscriber, so a transition step is
//! seen either entirely or not at all. The UI loop keeps a receiver and
//! only redraws after a change.

use std::sync::Arc;

use tokio::sync::watch;

use crate::state::ListState;

/// Shared handle to the list state.
#[derive(Debug, Clone)]
pub struct StateStore {
    tx: Arc<watch::Sender<ListState>>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(ListState::default())
    }
}

impl StateStore {
    /// Creates a store holding `initial`.
    #[must_use]
    pub fn new(initial: ListState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Applies `f` atomically and notifies subscribers.
    pub fn update(&self, f: impl FnOnce(&mut ListState)) {
        self.tx.send_modify(f);
    }

    /// Applies `f` atomically; subscribers are notified only if it returns
    /// true. Returns what `f` returned.
    ///
    /// Used for check-and-set steps such as "mark this id loading unless it
    /// already is".
    pub fn update_if(&self, f: impl FnOnce(&mut ListState) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Reads the state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&ListState) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Clones the current state.
    #[must_use]
    pub fn snapshot(&self) -> ListState {
        self.tx.borrow().clone()
    }

    /// A receiver that is marked changed after every update.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.tx.subscribe()
    }
}
