use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use clinic_scheduler_api::{create_router, AppState};
use notification_cell::{NotificationError, Notifier};
use shared_storage::DocumentStore;
use shared_utils::test_utils::{init_test_tracing, seeded_store, TestConfig, APPOINTMENTS_KEY};

#[derive(Default)]
struct RecordingNotifier {
    recipients: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, recipient: &str, _subject: &str, _body: &str) -> Result<(), NotificationError> {
        self.recipients.lock().unwrap().push(recipient.to_string());
        Ok(())
    }
}

async fn create_test_app() -> (Router, Arc<dyn DocumentStore>, Arc<RecordingNotifier>) {
    init_test_tracing();

    let config = TestConfig::default().to_app_config(std::path::Path::new("."));
    let store: Arc<dyn DocumentStore> = Arc::new(seeded_store(None).await);
    let notifier = Arc::new(RecordingNotifier::default());

    let state = AppState::build(&config, store.clone(), notifier.clone())
        .await
        .unwrap();

    (create_router(state), store, notifier)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_root_is_alive() {
    let (app, _, _) = create_test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_find_doctor_then_book_then_cancel() {
    let (app, store, notifier) = create_test_app().await;

    let (status, doctors) = call(&app, "GET", "/doctors/search?disease=rash", None).await;
    assert_eq!(status, StatusCode::OK);
    let doctor = doctors["doctors"][0]["name"].as_str().unwrap().to_string();
    assert_eq!(doctor, "Dr. C");

    let (status, booked) = call(
        &app,
        "POST",
        "/appointments",
        Some(json!({
            "doctor": doctor,
            "patient": "p1@example.com",
            "disease": "rash",
            "start_time": "2024-01-01T10:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booked["notification"]["status"], "sent");

    let persisted = store.load(APPOINTMENTS_KEY).await.unwrap().unwrap();
    assert_eq!(persisted.as_array().unwrap().len(), 1);

    let (status, _) = call(
        &app,
        "POST",
        "/appointments/cancel",
        Some(json!({ "doctor": "Dr. C", "start_time": "2024-01-01T10:00:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let persisted = store.load(APPOINTMENTS_KEY).await.unwrap().unwrap();
    assert!(persisted.as_array().unwrap().is_empty());

    let recipients = notifier.recipients.lock().unwrap().clone();
    assert_eq!(recipients, vec!["p1@example.com", "p1@example.com"]);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _, _) = create_test_app().await;

    let (status, _) = call(&app, "GET", "/appointments/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
