use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::AcknowledgeError;
use crate::models::notification::Notification;
use crate::services::NotificationBackend;
use crate::tasks::auto_refresh;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct StoreState {
    pub status: StoreStatus,
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub last_fetched_at: Option<DateTime<Utc>>,
    /// Set once the first fetch has been started.
    pub has_fetched: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            status: StoreStatus::Idle,
            notifications: Vec::new(),
            unread_count: 0,
            last_fetched_at: None,
            has_fetched: false,
        }
    }
}

struct Inner {
    backend: Arc<dyn NotificationBackend>,
    state: watch::Sender<StoreState>,
    fetch_seq: AtomicU64,
    auto_refresh: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.auto_refresh.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let slot = self.auto_refresh.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

/// Owns the notification list for one session.
///
/// Cheap to clone; clones share state. Every mutation is published through
/// [`NotificationStore::subscribe`]. Overlapping fetches are not fenced: the
/// response that settles last overwrites the list.
#[derive(Clone)]
pub struct NotificationStore {
    inner: Arc<Inner>,
}

/// Non-owning handle held by the refresh loop.
#[derive(Clone)]
pub struct WeakNotificationStore {
    inner: Weak<Inner>,
}

impl WeakNotificationStore {
    pub fn upgrade(&self) -> Option<NotificationStore> {
        self.inner.upgrade().map(|inner| NotificationStore { inner })
    }
}

impl NotificationStore {
    pub fn new(backend: Arc<dyn NotificationBackend>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            inner: Arc::new(Inner {
                backend,
                state,
                fetch_seq: AtomicU64::new(0),
                auto_refresh: Mutex::new(None),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakNotificationStore {
        WeakNotificationStore {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn snapshot(&self) -> StoreState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.inner.state.subscribe()
    }

    /// Replace the list with whatever the backend returns. Failures keep the
    /// previous list and move the store to `Failed`.
    pub async fn fetch(&self) {
        let seq = self.inner.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;

        self.inner.state.send_modify(|state| {
            state.status = StoreStatus::Loading;
            state.has_fetched = true;
        });
        log::info!("Fetching notifications (request #{})", seq);

        match self.inner.backend.fetch_notifications().await {
            Ok(fetched) => {
                let notifications = dedupe(fetched);
                let unread_count = count_unread(&notifications);
                log::info!(
                    "Request #{} returned {} notifications ({} unread)",
                    seq,
                    notifications.len(),
                    unread_count
                );

                self.inner.state.send_modify(|state| {
                    state.notifications = notifications;
                    state.unread_count = unread_count;
                    state.status = StoreStatus::Ready;
                    state.last_fetched_at = Some(Utc::now());
                });
            }
            Err(e) => {
                log::warn!("Request #{} failed to fetch notifications: {}", seq, e);
                self.inner.state.send_modify(|state| {
                    state.status = StoreStatus::Failed(e.to_string());
                });
            }
        }
    }

    /// Mark one notification read on the backend, then locally. A failure
    /// leaves local state untouched and is returned to the caller. Unknown or
    /// already-read ids change nothing locally.
    pub async fn acknowledge(&self, id: &str) -> Result<(), AcknowledgeError> {
        if let Err(e) = self.inner.backend.mark_notification_as_read(id).await {
            log::warn!("Failed to acknowledge notification {}: {}", id, e);
            return Err(e);
        }

        let updated = self.inner.state.send_if_modified(|state| {
            let Some(entry) = state.notifications.iter_mut().find(|n| n.id == id) else {
                return false;
            };
            if entry.read {
                return false;
            }

            entry.mark_read();
            state.unread_count = state.unread_count.saturating_sub(1);
            true
        });

        if updated {
            log::info!("Notification {} acknowledged", id);
        } else {
            log::debug!("Notification {} acknowledged but not pending locally", id);
        }

        Ok(())
    }

    /// Start (or restart) periodic fetching. Must be called inside a tokio runtime.
    pub fn start_auto_refresh(&self, interval: Duration) {
        let interval = if interval.is_zero() {
            log::warn!("Zero auto-refresh interval requested, using 1ms");
            Duration::from_millis(1)
        } else {
            interval
        };

        let mut slot = self.inner.timer();
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        *slot = Some(auto_refresh::spawn(self.downgrade(), interval));

        log::info!("Auto-refresh started every {:?}", interval);
    }

    /// Cancel the refresh timer. Returns whether one was running.
    pub fn stop_auto_refresh(&self) -> bool {
        match self.inner.timer().take() {
            Some(handle) => {
                handle.abort();
                log::info!("Auto-refresh stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.inner
            .timer()
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }
}

fn count_unread(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

/// Keep the first occurrence of each id.
fn dedupe(notifications: Vec<Notification>) -> Vec<Notification> {
    let mut seen = HashSet::with_capacity(notifications.len());
    notifications
        .into_iter()
        .filter(|n| {
            let fresh = seen.insert(n.id.clone());
            if !fresh {
                log::warn!("Dropping duplicate notification id {}", n.id);
            }
            fresh
        })
        .collect()
}
