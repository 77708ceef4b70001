use serde::Serialize;
use chrono::{DateTime, Utc};

use crate::models::notification::Notification;

/// What the presentation layer shows for one notification. Empty `link` and
/// `link_text` mean "no action available".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationContent {
    pub title: String,
    pub message: String,
    pub link: String,
    pub link_text: String,
}

impl NotificationContent {
    pub fn has_action(&self) -> bool {
        !self.link.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum PanelStatus {
    Idle,
    Loading,
    Error(String),
    Ready,
}

impl std::fmt::Display for PanelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelStatus::Idle => write!(f, "idle"),
            PanelStatus::Loading => write!(f, "loading"),
            PanelStatus::Error(message) => write!(f, "error: {}", message),
            PanelStatus::Ready => write!(f, "ready"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelEntry {
    pub notification: Notification,
    pub content: NotificationContent,
    pub created_at: Option<DateTime<Utc>>,
    pub created_at_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub entries: Vec<PanelEntry>,
    pub unread_count: usize,
    pub status: PanelStatus,
}
