use crate::models::common::NotificationContent;
use crate::models::notification::Notification;

type ContentFn = fn(&Notification) -> NotificationContent;

/// Known type tags. Anything not listed resolves to [`fallback`].
const KNOWN_TYPES: &[(&str, ContentFn)] = &[
    ("new_google_user", new_google_user),
    ("system_alert", system_alert),
];

pub struct NotificationTypeResolver;

impl NotificationTypeResolver {
    /// Map a notification to its display payload. Never fails: missing or
    /// unrecognized type tags get the generic fallback.
    pub fn resolve(notification: &Notification) -> NotificationContent {
        let content_fn = notification
            .kind
            .as_deref()
            .and_then(|kind| KNOWN_TYPES.iter().find(|(tag, _)| *tag == kind))
            .map(|(_, content_fn)| *content_fn)
            .unwrap_or(fallback);

        content_fn(notification)
    }
}

fn new_google_user(notification: &Notification) -> NotificationContent {
    let who = notification
        .field_str("userName")
        .or_else(|| notification.field_str("userEmail"))
        .unwrap_or("A new user");

    NotificationContent {
        title: "New Google sign-up".to_string(),
        message: format!("{} signed up with Google.", who),
        link: "/admin/users".to_string(),
        link_text: "View users".to_string(),
    }
}

fn system_alert(notification: &Notification) -> NotificationContent {
    let message = notification
        .field_str("message")
        .unwrap_or("A system event requires attention.");

    without_action("System alert", message)
}

fn fallback(_notification: &Notification) -> NotificationContent {
    without_action("Notification", "You have a new notification.")
}

fn without_action(title: &str, message: &str) -> NotificationContent {
    NotificationContent {
        title: title.to_string(),
        message: message.to_string(),
        link: String::new(),
        link_text: String::new(),
    }
}
