pub mod notification_api;
pub mod resolver;
pub mod store;

use async_trait::async_trait;

use crate::error::{AcknowledgeError, FetchError};
use crate::models::notification::Notification;

/// The backend the store talks to. The store is the only caller.
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    async fn fetch_notifications(&self) -> Result<Vec<Notification>, FetchError>;

    async fn mark_notification_as_read(&self, id: &str) -> Result<(), AcknowledgeError>;
}
