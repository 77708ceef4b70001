use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{AcknowledgeError, FetchError};
use crate::models::notification::Notification;
use crate::services::NotificationBackend;

/// In-memory backend with switchable failures and call counters.
#[derive(Default)]
pub struct FakeBackend {
    pub notifications: Mutex<Vec<Notification>>,
    pub fail_fetch: AtomicBool,
    pub fail_ack: AtomicBool,
    pub fetch_calls: AtomicUsize,
    pub ack_calls: AtomicUsize,
    /// When set, every fetch waits for a permit before answering.
    pub gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    pub fn with(notifications: Vec<Notification>) -> Arc<Self> {
        Arc::new(Self {
            notifications: Mutex::new(notifications),
            ..Default::default()
        })
    }

    pub fn gated(notifications: Vec<Notification>, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            notifications: Mutex::new(notifications),
            gate: Some(gate),
            ..Default::default()
        })
    }

    pub fn set_notifications(&self, notifications: Vec<Notification>) {
        *self.notifications.lock().unwrap() = notifications;
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn acks(&self) -> usize {
        self.ack_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationBackend for FakeBackend {
    async fn fetch_notifications(&self) -> Result<Vec<Notification>, FetchError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(FetchError::Custom("backend unavailable".to_string()));
        }

        Ok(self.notifications.lock().unwrap().clone())
    }

    async fn mark_notification_as_read(&self, _id: &str) -> Result<(), AcknowledgeError> {
        self.ack_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_ack.load(Ordering::SeqCst) {
            return Err(AcknowledgeError::Custom("write rejected".to_string()));
        }

        Ok(())
    }
}

pub fn unread(id: &str) -> Notification {
    Notification::new(id, "new_google_user").with_field("userName", format!("User {}", id))
}

pub fn read(id: &str) -> Notification {
    let mut notification = unread(id);
    notification.mark_read();
    notification
}

/// Let spawned tasks run until they block again.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
