use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::services::store::WeakNotificationStore;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(300_000);

/// Spawn the periodic refresh loop. The first fetch happens one full period
/// after start. Holds only a weak handle, so the loop ends on its own once
/// the store is gone.
///
/// Each tick's fetch runs as its own task: aborting the loop cancels the
/// wait for the next tick, never a fetch already in flight.
pub fn spawn(store: WeakNotificationStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(store) = store.upgrade() else {
                log::debug!("Notification store dropped, auto-refresh exiting");
                break;
            };

            log::debug!("Auto-refresh tick");
            let fetch = tokio::spawn(async move { store.fetch().await });
            if let Err(e) = fetch.await {
                log::error!("Auto-refresh fetch task failed: {}", e);
            }
        }
    })
}
