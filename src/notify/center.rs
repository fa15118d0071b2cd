//! Ordered set of live notifications with timer-based expiry

use super::notification::{Notification, NotificationKind, DEFAULT_DURATION_MS};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

struct Slot {
    notification: Notification,
    /// Handle of the pending removal timer
    expiry: Option<AbortHandle>,
}

struct Inner {
    next_id: AtomicU64,
    slots: Mutex<Vec<Slot>>,
}

impl Inner {
    fn take(&self, id: u64) -> Option<Slot> {
        let mut slots = self.slots.lock();
        let index = slots.iter().position(|slot| slot.notification.id == id)?;
        Some(slots.remove(index))
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        for slot in self.slots.get_mut().drain(..) {
            if let Some(expiry) = slot.expiry {
                expiry.abort();
            }
        }
    }
}

/// Process-wide notification list
///
/// Cloning yields another handle to the same list. Expiry timers run on the
/// ambient tokio runtime and hold only a weak reference to the list; without
/// a runtime, notifications stay until removed.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(1),
                slots: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Add a notification and schedule its removal
    ///
    /// `duration_ms` defaults to 3000; 0 keeps it until removed.
    pub fn push(&self, kind: NotificationKind, message: impl Into<String>, duration_ms: Option<u64>) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            kind,
            message: message.into(),
            duration_ms: duration_ms.unwrap_or(DEFAULT_DURATION_MS),
        };
        let lifetime = notification.lifetime();

        // The slot is inserted before the timer exists, and the timer's
        // removal has to take this same lock.
        let mut slots = self.inner.slots.lock();
        let expiry = lifetime.and_then(|lifetime| self.schedule_removal(id, lifetime));
        slots.push(Slot {
            notification,
            expiry,
        });
        id
    }

    fn schedule_removal(&self, id: u64, lifetime: Duration) -> Option<AbortHandle> {
        let handle = Handle::try_current().ok()?;
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let deadline = tokio::time::Instant::now() + lifetime;
        let task = handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(inner) = inner.upgrade() {
                inner.take(id);
            }
        });
        Some(task.abort_handle())
    }

    pub fn success(&self, message: impl Into<String>, duration_ms: Option<u64>) -> u64 {
        self.push(NotificationKind::Success, message, duration_ms)
    }

    pub fn error(&self, message: impl Into<String>, duration_ms: Option<u64>) -> u64 {
        self.push(NotificationKind::Error, message, duration_ms)
    }

    pub fn warning(&self, message: impl Into<String>, duration_ms: Option<u64>) -> u64 {
        self.push(NotificationKind::Warning, message, duration_ms)
    }

    pub fn info(&self, message: impl Into<String>, duration_ms: Option<u64>) -> u64 {
        self.push(NotificationKind::Info, message, duration_ms)
    }

    /// Remove a notification; removing a missing id is a no-op
    pub fn remove(&self, id: u64) -> bool {
        match self.inner.take(id) {
            Some(slot) => {
                if let Some(expiry) = slot.expiry {
                    expiry.abort();
                }
                true
            }
            None => false,
        }
    }

    /// Stop the expiry timer, keeping the notification until removed
    pub fn cancel_expiry(&self, id: u64) -> bool {
        let mut slots = self.inner.slots.lock();
        match slots.iter_mut().find(|slot| slot.notification.id == id) {
            Some(slot) => {
                if let Some(expiry) = slot.expiry.take() {
                    expiry.abort();
                }
                slot.notification.duration_ms = 0;
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        let drained: Vec<Slot> = self.inner.slots.lock().drain(..).collect();
        for slot in drained {
            if let Some(expiry) = slot.expiry {
                expiry.abort();
            }
        }
    }

    pub fn get(&self, id: u64) -> Option<Notification> {
        self.inner
            .slots
            .lock()
            .iter()
            .find(|slot| slot.notification.id == id)
            .map(|slot| slot.notification.clone())
    }

    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    /// Live notifications in insertion order
    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner
            .slots
            .lock()
            .iter()
            .map(|slot| slot.notification.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.slots.lock().is_empty()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("live", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_duration() {
        let center = NotificationCenter::new();
        let id = center.info("Saved", Some(500));
        assert!(center.contains(id));

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(center.contains(id));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!center.contains(id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_is_sticky() {
        let center = NotificationCenter::new();
        let id = center.info("Processing...", Some(0));

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(center.contains(id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_duration() {
        let center = NotificationCenter::new();
        let id = center.success("Done", None);
        assert_eq!(center.get(id).unwrap().duration_ms, 3000);

        tokio::time::sleep(Duration::from_millis(3001)).await;
        assert!(center.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_is_idempotent_and_cancels_timer() {
        let center = NotificationCenter::new();
        let first = center.error("boom", Some(100));
        let second = center.warning("careful", Some(100));

        assert!(center.remove(first));
        assert!(!center.remove(first));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(center.is_empty());
        assert!(!center.remove(second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_expiry() {
        let center = NotificationCenter::new();
        let id = center.info("pinned", Some(100));
        assert!(center.cancel_expiry(id));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(center.get(id).unwrap().is_sticky());
    }

    #[test]
    fn test_ids_unique_and_ordered_without_runtime() {
        let center = NotificationCenter::new();
        let a = center.info("a", None);
        let b = center.info("b", None);
        assert!(b > a);

        let kinds: Vec<_> = center.snapshot().iter().map(|n| n.message.clone()).collect();
        assert_eq!(kinds, vec!["a", "b"]);

        center.clear();
        assert!(center.is_empty());
    }
}
