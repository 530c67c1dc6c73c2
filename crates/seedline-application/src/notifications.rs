//! Transient user notifications.
//!
//! Every `show` appends an entry and schedules its own removal after the
//! entry's delay. Removal is by identity, so the timer firing after a manual
//! `remove` is a no-op.

use chrono::{DateTime, Utc};
use seedline_core::notification::{Notification, NotificationId, NotificationKind};
use std::sync::{Arc, Weak};
use tokio::sync::watch;

/// A notification currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ShownNotification {
    pub id: NotificationId,
    pub notification: Notification,
    pub shown_at: DateTime<Utc>,
}

impl ShownNotification {
    /// Whether the entry has stayed longer than its delay as of `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        let delay = chrono::Duration::from_std(self.notification.delay())
            .unwrap_or(chrono::Duration::MAX);
        now - self.shown_at > delay
    }
}

struct Inner {
    tx: watch::Sender<Vec<ShownNotification>>,
}

/// Ordered queue of visible notifications. Cheap to clone.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<Inner>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner { tx }),
        }
    }

    /// Appends `notification` and schedules its removal.
    ///
    /// Outside a Tokio runtime the entry stays until removed explicitly.
    pub fn show(&self, notification: Notification) -> NotificationId {
        let id = NotificationId::new();
        let delay = notification.delay();
        tracing::debug!("[Notifications] show {} ({:?})", id, notification.header);

        self.inner.tx.send_modify(|list| {
            list.push(ShownNotification {
                id,
                notification,
                shown_at: Utc::now(),
            })
        });

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let weak: Weak<Inner> = Arc::downgrade(&self.inner);
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Some(inner) = weak.upgrade() {
                        remove_from(&inner, id);
                    }
                });
            }
            Err(_) => {
                tracing::warn!("[Notifications] No runtime, {} will not expire", id);
            }
        }

        id
    }

    pub fn success(&self, body: impl Into<String>) -> NotificationId {
        self.show(Notification::preset(NotificationKind::Success, body))
    }

    pub fn error(&self, body: impl Into<String>) -> NotificationId {
        self.show(Notification::preset(NotificationKind::Error, body))
    }

    pub fn info(&self, body: impl Into<String>) -> NotificationId {
        self.show(Notification::preset(NotificationKind::Info, body))
    }

    pub fn warning(&self, body: impl Into<String>) -> NotificationId {
        self.show(Notification::preset(NotificationKind::Warning, body))
    }

    /// Removes the entry with `id`. Unknown ids are ignored.
    pub fn remove(&self, id: NotificationId) {
        remove_from(&self.inner, id);
    }

    /// Visible entries in display order.
    pub fn snapshot(&self) -> Vec<ShownNotification> {
        self.inner.tx.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.tx.borrow().is_empty()
    }

    /// Receiver notified on every show and removal.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ShownNotification>> {
        self.inner.tx.subscribe()
    }

    /// Entries still present past their delay as of `now`.
    pub fn overdue(&self, now: DateTime<Utc>) -> Vec<ShownNotification> {
        self.inner
            .tx
            .borrow()
            .iter()
            .filter(|shown| shown.is_overdue(now))
            .cloned()
            .collect()
    }
}

fn remove_from(inner: &Inner, id: NotificationId) {
    inner.tx.send_if_modified(|list| {
        let before = list.len();
        list.retain(|shown| shown.id != id);
        before != list.len()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_show_expires_after_default_delay() {
        let queue = NotificationQueue::new();
        let id = queue.success("Tải lên thành công");

        let shown = queue.snapshot();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, id);
        assert_eq!(shown[0].notification.header.as_deref(), Some("Thành công"));
        assert_eq!(
            shown[0].notification.style_class.as_deref(),
            Some("bg-success text-white")
        );

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(queue.len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_remove_then_timer_is_harmless() {
        let queue = NotificationQueue::new();
        let first = queue.error("boom");
        let second = queue.info("fyi");

        queue.remove(first);
        assert_eq!(queue.snapshot().len(), 1);
        assert_eq!(queue.snapshot()[0].id, second);

        // Removing again is a no-op
        queue.remove(first);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_text_is_timed_independently() {
        let queue = NotificationQueue::new();
        let a = queue.show(Notification::new("same").with_delay(Duration::from_millis(500)));
        let b = queue.show(Notification::new("same").with_delay(Duration::from_millis(1500)));
        assert_ne!(a, b);

        tokio::time::sleep(Duration::from_millis(600)).await;
        let left = queue.snapshot();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, b);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_changes() {
        let queue = NotificationQueue::new();
        let mut rx = queue.subscribe();

        queue.warning("careful");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_empty());
    }

    #[test]
    fn test_overdue_detection() {
        let queue = NotificationQueue::new();
        let id = queue.show(Notification::new("stuck"));

        let now = Utc::now();
        assert!(queue.overdue(now).is_empty());
        let later = now + chrono::Duration::seconds(3);
        let overdue = queue.overdue(later);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, id);
    }
}
