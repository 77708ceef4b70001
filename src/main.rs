use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;

use notification_panel::config::Config;
use notification_panel::handlers::panel::NotificationPanelController;
use notification_panel::models::common::ViewModel;
use notification_panel::services::notification_api::NotificationApiService;
use notification_panel::services::store::NotificationStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().context("NOTIFICATIONS_API_URL must be set in the environment or .env file")?;

    let api = NotificationApiService::new(config.api.clone()).context("Failed to build HTTP client")?;
    let store = NotificationStore::new(Arc::new(api));
    let panel = NotificationPanelController::new(store, &config.panel);

    println!("🔔 Watching notifications at {}", config.api.base_url);
    println!("   Refreshing every {:?}, Ctrl-C to stop", config.panel.refresh_interval());

    let mut changes = panel.subscribe();
    panel.on_open().await;
    report(&panel.view_model());
    changes.borrow_and_update();

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                report(&panel.view_model());
            }
            _ = tokio::signal::ctrl_c() => {
                println!("👋 Shutting down");
                break;
            }
        }
    }

    panel.on_close();
    Ok(())
}

fn report(view: &ViewModel) {
    log::info!("Panel {} with {} unread of {}", view.status, view.unread_count, view.entries.len());

    for entry in &view.entries {
        let marker = if entry.notification.read { " " } else { "●" };
        println!(
            "{} [{}] {}: {}",
            marker, entry.created_at_label, entry.content.title, entry.content.message
        );
        if entry.content.has_action() {
            println!("    → {} ({})", entry.content.link_text, entry.content.link);
        }
    }
}
