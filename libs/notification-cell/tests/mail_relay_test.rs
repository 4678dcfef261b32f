use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notification_cell::{MailRelayNotifier, NotificationError, Notifier};
use shared_config::AppConfig;
use shared_utils::test_utils::TestConfig;

fn relay_config(server: &MockServer) -> AppConfig {
    TestConfig::default()
        .with_relay(format!("{}/api/send", server.uri()))
        .to_app_config(std::path::Path::new("."))
}

#[tokio::test]
async fn test_missing_credentials_is_configuration_error() {
    let config = AppConfig::default();

    let result = MailRelayNotifier::new(&config);
    assert_matches!(result, Err(NotificationError::NotConfigured));
}

#[tokio::test]
async fn test_missing_password_fails_before_any_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = AppConfig {
        sender_password: String::new(),
        ..relay_config(&mock_server)
    };

    assert_matches!(MailRelayNotifier::new(&config), Err(NotificationError::NotConfigured));
}

#[tokio::test]
async fn test_notify_posts_message_to_relay() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/send"))
        .and(header_exists("authorization"))
        .and(body_partial_json(json!({
            "from": "clinic@example.com",
            "to": "p1@example.com",
            "subject": "Appointment Confirmation"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = MailRelayNotifier::new(&relay_config(&mock_server)).unwrap();
    assert_eq!(notifier.sender(), "clinic@example.com");

    let result = notifier
        .notify("p1@example.com", "Appointment Confirmation", "Your appointment is confirmed.")
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_relay_rejection_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/send"))
        .respond_with(ResponseTemplate::new(535).set_body_string("authentication failed"))
        .mount(&mock_server)
        .await;

    let notifier = MailRelayNotifier::new(&relay_config(&mock_server)).unwrap();

    let result = notifier.notify("p1@example.com", "Subject", "Body").await;
    assert_matches!(result, Err(NotificationError::RelayRejected { message }) if message.contains("authentication failed"));
}
