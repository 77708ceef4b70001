use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::{AcknowledgeError, FetchError};
use crate::models::notification::Notification;
use crate::services::NotificationBackend;

/// Either a bare array or the `{ "success": .., "data": [..] }` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum NotificationsPayload {
    List(Vec<Notification>),
    Envelope { data: Vec<Notification> },
}

/// HTTP implementation of [`NotificationBackend`] against the admin API.
#[derive(Clone)]
pub struct NotificationApiService {
    client: Client,
    config: ApiConfig,
}

impl NotificationApiService {
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, String> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| format!("Invalid API base URL {}: {}", self.config.base_url, e))?;

        url.path_segments_mut()
            .map_err(|_| format!("API base URL {} cannot carry a path", self.config.base_url))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl NotificationBackend for NotificationApiService {
    async fn fetch_notifications(&self) -> Result<Vec<Notification>, FetchError> {
        let url = self
            .endpoint(&["api", "v1", "notifications"])
            .map_err(FetchError::Custom)?;

        log::debug!("GET {}", url);

        let response = self
            .authorized(self.client.get(url))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_notifications(&body)
    }

    async fn mark_notification_as_read(&self, id: &str) -> Result<(), AcknowledgeError> {
        let url = self
            .endpoint(&["api", "v1", "notifications", id, "acknowledge"])
            .map_err(AcknowledgeError::Custom)?;

        log::debug!("POST {}", url);

        let response = self.authorized(self.client.post(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AcknowledgeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

pub fn parse_notifications(body: &str) -> Result<Vec<Notification>, FetchError> {
    let payload: NotificationsPayload = serde_json::from_str(body)?;
    Ok(match payload {
        NotificationsPayload::List(notifications) => notifications,
        NotificationsPayload::Envelope { data } => data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;
    use crate::handlers::panel::NotificationPanelController;
    use crate::models::common::PanelStatus;
    use crate::services::store::NotificationStore;
    use actix_web::web::{Data, Path};
    use actix_web::{get, post, App, HttpRequest, HttpResponse, HttpServer};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    const TOKEN: &str = "secret-token";

    type Acknowledged = Data<Mutex<Vec<String>>>;

    #[get("/api/v1/notifications")]
    async fn list_notifications(req: HttpRequest) -> HttpResponse {
        let authorized = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .map_or(false, |v| v == format!("Bearer {}", TOKEN));

        if !authorized {
            return HttpResponse::Unauthorized().body("missing token");
        }

        HttpResponse::Ok().json(json!([
            {
                "id": "n1",
                "type": "new_google_user",
                "read": false,
                "createdAt": { "_seconds": 1709287200, "_nanoseconds": 0 },
                "userEmail": "a@x.com"
            },
            {
                "id": "n2",
                "type": "system_alert",
                "acknowledged": true,
                "createdAt": "2024-03-01T10:00:00Z",
                "message": "Backup finished"
            }
        ]))
    }

    #[post("/api/v1/notifications/{notification_id}/acknowledge")]
    async fn acknowledge(acknowledged: Acknowledged, path: Path<String>) -> HttpResponse {
        let notification_id = path.into_inner();
        if notification_id == "missing" {
            return HttpResponse::NotFound().body("no such notification");
        }

        acknowledged.lock().unwrap().push(notification_id);
        HttpResponse::Ok().json(json!({ "message": "Notification marked as read" }))
    }

    fn spawn_backend() -> (String, Acknowledged) {
        let acknowledged: Acknowledged = Data::new(Mutex::new(Vec::new()));
        let shared = acknowledged.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(shared.clone())
                .service(list_notifications)
                .service(acknowledge)
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        (format!("http://{}", addr), acknowledged)
    }

    fn service(base_url: &str, token: Option<&str>) -> NotificationApiService {
        let mut config = ApiConfig::new(base_url);
        config.auth_token = token.map(str::to_string);
        NotificationApiService::new(config).unwrap()
    }

    #[actix_web::test]
    async fn test_fetch_notifications() {
        let (base_url, _) = spawn_backend();
        let api = service(&base_url, Some(TOKEN));

        let notifications = api.fetch_notifications().await.unwrap();

        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].field_str("userEmail"), Some("a@x.com"));
        assert!(!notifications[0].read);
        assert!(notifications[1].read);
    }

    #[actix_web::test]
    async fn test_fetch_without_token_is_status_error() {
        let (base_url, _) = spawn_backend();
        let api = service(&base_url, None);

        let err = api.fetch_notifications().await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 401, ref body } if body == "missing token"));
    }

    #[actix_web::test]
    async fn test_acknowledge_posts_to_backend() {
        let (base_url, acknowledged) = spawn_backend();
        let api = service(&base_url, Some(TOKEN));

        api.mark_notification_as_read("n1").await.unwrap();
        let err = api.mark_notification_as_read("missing").await.unwrap_err();

        assert!(matches!(err, AcknowledgeError::Status { status: 404, .. }));
        assert_eq!(*acknowledged.lock().unwrap(), vec!["n1".to_string()]);
    }

    #[actix_web::test]
    async fn test_panel_over_http() {
        let (base_url, acknowledged) = spawn_backend();
        let store = NotificationStore::new(Arc::new(service(&base_url, Some(TOKEN))));
        let panel = NotificationPanelController::new(store, &PanelConfig::default());

        panel.on_open().await;
        let view = panel.view_model();
        assert_eq!(view.status, PanelStatus::Ready);
        assert_eq!(view.unread_count, 1);
        assert!(view.entries[0].content.message.contains("a@x.com"));
        assert_eq!(view.entries[0].created_at_label, "2024-03-01T10:00:00Z");
        assert_eq!(view.entries[1].content.message, "Backup finished");

        panel.on_acknowledge("n1").await;
        assert_eq!(panel.view_model().unread_count, 0);
        assert_eq!(acknowledged.lock().unwrap().len(), 1);

        panel.on_close();
    }

    #[tokio::test]
    async fn test_invalid_base_url() {
        let api = service("not a url", None);

        let err = api.fetch_notifications().await.unwrap_err();
        assert!(matches!(err, FetchError::Custom(ref msg) if msg.contains("not a url")));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = service("https://admin.example.com/panel/", None);

        let url = api.endpoint(&["api", "v1", "notifications", "n 1", "acknowledge"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://admin.example.com/panel/api/v1/notifications/n%201/acknowledge"
        );
    }

    #[test]
    fn test_parse_envelope_and_list() {
        let list = parse_notifications(r#"[{"id":"a"}]"#).unwrap();
        assert_eq!(list.len(), 1);

        let envelope = parse_notifications(r#"{"success":true,"data":[{"id":"a"},{"id":"b"}]}"#).unwrap();
        assert_eq!(envelope.len(), 2);

        assert!(matches!(parse_notifications("{\"oops\":1}"), Err(FetchError::Decode(_))));
    }
}
