//! Transient user-facing status messages.
//!
//! A [`NotificationCenter`] holds at most one notification at a time. Showing
//! a new one replaces the current message and restarts the auto-clear timer;
//! exactly one timer task is pending at any moment, and a superseded timer
//! can never clear a newer message.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::debug;

/// Visual/severity category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient status message shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// How long a notification stays visible unless superseded.
pub const DEFAULT_TTL: Duration = Duration::from_millis(3000);

/// Single-slot notification emitter with an auto-clear timer.
///
/// Cheap to clone; clones share the same slot. `show` must be called from
/// within a Tokio runtime.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    ttl: Duration,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    current: Option<Notification>,
    /// Bumped on every `show`; a timer task only clears the slot when its
    /// captured generation is still the live one.
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                ttl,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Replace the current notification and restart the auto-clear timer.
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) {
        let message = message.into();
        debug!(%message, ?kind, "notification shown");

        let mut state = self.inner.state.lock();
        state.generation += 1;
        let generation = state.generation;

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.current = Some(Notification { message, kind });

        let inner = Arc::clone(&self.inner);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.ttl).await;
            let mut state = inner.state.lock();
            // A newer notification owns the slot now; leave it alone.
            if state.generation == generation {
                state.current = None;
                state.timer = None;
            }
        }));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Error);
    }

    /// The live notification, if any.
    pub fn current(&self) -> Option<Notification> {
        self.inner.state.lock().current.clone()
    }

    /// Dismiss the current notification and cancel its timer.
    pub fn clear(&self) {
        let mut state = self.inner.state.lock();
        state.generation += 1;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_auto_clears_after_ttl() {
        let center = NotificationCenter::default();
        center.success("Emails sent successfully");
        assert_eq!(
            center.current().map(|n| n.kind),
            Some(NotificationKind::Success)
        );

        tokio::time::sleep(Duration::from_millis(3001)).await;
        tokio::task::yield_now().await;
        assert!(center.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_notification_wins_and_restarts_timer() {
        let center = NotificationCenter::default();
        center.error("first");

        tokio::time::sleep(Duration::from_millis(1500)).await;
        center.success("second");

        // Past the first timer's deadline; the superseded timer must not
        // clear the newer message.
        tokio::time::sleep(Duration::from_millis(2000)).await;
        tokio::task::yield_now().await;
        let current = center.current().expect("second notification still live");
        assert_eq!(current.message, "second");
        assert_eq!(current.kind, NotificationKind::Success);

        // Full TTL after the second show, it clears.
        tokio::time::sleep(Duration::from_millis(1600)).await;
        tokio::task::yield_now().await;
        assert!(center.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_clear_cancels_timer() {
        let center = NotificationCenter::default();
        center.error("oops");
        center.clear();
        assert!(center.current().is_none());

        // Showing again right after a clear still sticks for the full TTL.
        center.success("fresh");
        tokio::time::sleep(Duration::from_millis(2999)).await;
        tokio::task::yield_now().await;
        assert_eq!(center.current().map(|n| n.message), Some("fresh".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_the_slot() {
        let center = NotificationCenter::default();
        let other = center.clone();
        center.success("shared");
        assert_eq!(other.current().map(|n| n.message), Some("shared".into()));
    }
}
