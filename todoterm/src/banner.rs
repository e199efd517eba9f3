//! Self-clearing error banner.
//!
//! A raised error stays visible for a fixed time unless a newer error
//! replaces it. There is a single timer slot: raising a new error aborts
//! the pending timer and arms a fresh one, and the timer only clears the
//! notice whose sequence number it was armed with.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::state::{ErrorNotice, TodoError};
use crate::store::StateStore;

/// How long an error stays on screen by default.
pub const DEFAULT_ERROR_TIMEOUT: Duration = Duration::from_secs(3);

/// Owner of the banner's timer.
#[derive(Debug)]
pub struct ErrorBanner {
    store: StateStore,
    timeout: Duration,
    next_seq: AtomicU64,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl ErrorBanner {
    /// Creates a banner writing into `store`.
    #[must_use]
    pub fn new(store: StateStore, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            next_seq: AtomicU64::new(1),
            timer: Mutex::new(None),
        }
    }

    /// Shows `kind`, replacing any current error and restarting the timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn raise(&self, kind: TodoError) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let expires_at = Instant::now() + self.timeout;
        self.store.update(|s| {
            s.error = Some(ErrorNotice {
                kind,
                expires_at,
                seq,
            });
        });

        let store = self.store.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(expires_at).await;
            store.update_if(|s| clear_if_current(s, seq));
        });

        if let Some(previous) = self.timer.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Hides the current error immediately.
    pub fn dismiss(&self) {
        if let Some(previous) = self.timer.lock().take() {
            previous.abort();
        }
        self.store.update_if(|s| s.error.take().is_some());
    }
}

impl Drop for ErrorBanner {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.get_mut().take() {
            timer.abort();
        }
    }
}

fn clear_if_current(state: &mut crate::state::ListState, seq: u64) -> bool {
    if state.error.is_some_and(|notice| notice.seq == seq) {
        state.error = None;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banner() -> (StateStore, ErrorBanner) {
        let store = StateStore::default();
        let banner = ErrorBanner::new(store.clone(), DEFAULT_ERROR_TIMEOUT);
        (store, banner)
    }

    #[tokio::test(start_paused = true)]
    async fn error_clears_after_timeout() {
        let (store, banner) = banner();
        banner.raise(TodoError::AddFailure);
        assert_eq!(store.snapshot().error_kind(), Some(TodoError::AddFailure));

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert_eq!(store.snapshot().error_kind(), Some(TodoError::AddFailure));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(store.snapshot().error_kind(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn new_error_restarts_the_timer() {
        let (store, banner) = banner();
        banner.raise(TodoError::AddFailure);
        tokio::time::sleep(Duration::from_secs(2)).await;

        banner.raise(TodoError::DeleteFailure);
        tokio::time::sleep(Duration::from_secs(2)).await;
        // the first timer would have fired by now
        assert_eq!(
            store.snapshot().error_kind(),
            Some(TodoError::DeleteFailure)
        );

        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(store.snapshot().error_kind(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn notice_carries_expiry() {
        let (store, banner) = banner();
        let before = Instant::now();
        banner.raise(TodoError::LoadFailure);
        let notice = store.snapshot().error.unwrap();
        assert_eq!(notice.expires_at, before + DEFAULT_ERROR_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_hides_immediately() {
        let (store, banner) = banner();
        banner.raise(TodoError::UpdateFailure);
        banner.dismiss();
        assert_eq!(store.snapshot().error_kind(), None);
    }

    #[test]
    fn stale_timer_does_not_clear_newer_notice() {
        let mut state = crate::state::ListState {
            error: Some(ErrorNotice {
                kind: TodoError::EmptyTitle,
                expires_at: Instant::now(),
                seq: 2,
            }),
            ..Default::default()
        };
        assert!(!clear_if_current(&mut state, 1));
        assert!(state.error.is_some());
        assert!(clear_if_current(&mut state, 2));
        assert!(state.error.is_none());
    }
}
