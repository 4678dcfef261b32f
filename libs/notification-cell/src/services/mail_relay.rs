// libs/notification-cell/src/services/mail_relay.rs
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{MailRelayRequest, NotificationError};
use crate::services::notifier::Notifier;

/// Sends mail through an HTTP relay, authenticating as the clinic's sender
/// account.
pub struct MailRelayNotifier {
    client: Client,
    relay_url: String,
    sender_email: String,
    sender_password: String,
}

// Manual impl so the sender password never appears in debug output.
impl std::fmt::Debug for MailRelayNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailRelayNotifier")
            .field("relay_url", &self.relay_url)
            .field("sender_email", &self.sender_email)
            .field("sender_password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl MailRelayNotifier {
    /// Fails with `NotConfigured` when either sender credential is missing, so
    /// the error surfaces at startup rather than on the first booking.
    pub fn new(config: &AppConfig) -> Result<Self, NotificationError> {
        if !config.is_notifier_configured() {
            error!("EMAIL or EMAIL_PASSWORD environment variables are not set");
            return Err(NotificationError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            relay_url: config.mail_relay_url.clone(),
            sender_email: config.sender_email.clone(),
            sender_password: config.sender_password.clone(),
        })
    }

    pub fn sender(&self) -> &str {
        &self.sender_email
    }
}

#[async_trait]
impl Notifier for MailRelayNotifier {
    async fn notify(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        let request_body = MailRelayRequest {
            from: self.sender_email.clone(),
            to: recipient.to_string(),
            subject: subject.to_string(),
            text: body.to_string(),
        };

        debug!("Sending mail to {} via {}", recipient, self.relay_url);

        let response = self
            .client
            .post(&self.relay_url)
            .basic_auth(&self.sender_email, Some(&self.sender_password))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let response_text = response.text().await.unwrap_or_default();
            error!("Failed to send email to {}: {} - {}", recipient, status, response_text);
            return Err(NotificationError::RelayRejected {
                message: format!("HTTP {}: {}", status, response_text),
            });
        }

        info!("Email sent to {} with subject: {}", recipient, subject);
        Ok(())
    }
}
