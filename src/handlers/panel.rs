use std::time::Duration;

use tokio::sync::watch;

use crate::config::PanelConfig;
use crate::models::common::{PanelEntry, PanelStatus, ViewModel};
use crate::models::notification::Notification;
use crate::services::resolver::NotificationTypeResolver;
use crate::services::store::{NotificationStore, StoreState, StoreStatus};
use crate::utils::timestamp;

/// Entry point for the presentation layer: a pull-based view-model plus the
/// user intents that mutate it.
#[derive(Clone)]
pub struct NotificationPanelController {
    store: NotificationStore,
    refresh_interval: Duration,
}

impl NotificationPanelController {
    pub fn new(store: NotificationStore, config: &PanelConfig) -> Self {
        Self {
            store,
            refresh_interval: config.refresh_interval(),
        }
    }

    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    /// Changes whenever the view-model should be re-read.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.store.subscribe()
    }

    pub fn view_model(&self) -> ViewModel {
        build_view_model(&self.store.snapshot())
    }

    /// First open fetches; every open makes sure the refresh timer runs.
    pub async fn on_open(&self) {
        if !self.store.is_auto_refreshing() {
            self.store.start_auto_refresh(self.refresh_interval);
        }

        if !self.store.snapshot().has_fetched {
            self.store.fetch().await;
        }
    }

    /// Failures are logged and the item simply stays unread.
    pub async fn on_acknowledge(&self, id: &str) {
        if let Err(e) = self.store.acknowledge(id).await {
            log::error!("Could not mark notification {} as read: {}", id, e);
        }
    }

    pub async fn on_manual_refresh(&self) {
        self.store.fetch().await;
    }

    pub fn on_close(&self) {
        self.store.stop_auto_refresh();
    }
}

pub fn build_view_model(state: &StoreState) -> ViewModel {
    ViewModel {
        entries: state.notifications.iter().map(build_entry).collect(),
        unread_count: state.unread_count,
        status: match &state.status {
            StoreStatus::Idle => PanelStatus::Idle,
            StoreStatus::Loading => PanelStatus::Loading,
            StoreStatus::Ready => PanelStatus::Ready,
            StoreStatus::Failed(message) => PanelStatus::Error(message.clone()),
        },
    }
}

fn build_entry(notification: &Notification) -> PanelEntry {
    let created_at = notification
        .created_at
        .as_ref()
        .and_then(|raw| match timestamp::normalize(raw) {
            Ok(instant) => Some(instant),
            Err(e) => {
                log::warn!("Notification {}: {}", notification.id, e);
                None
            }
        });

    PanelEntry {
        content: NotificationTypeResolver::resolve(notification),
        created_at_label: timestamp::label(created_at.as_ref()),
        created_at,
        notification: notification.clone(),
    }
}
