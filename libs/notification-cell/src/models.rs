// libs/notification-cell/src/models.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl NotificationMessage {
    pub fn new(recipient: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Payload posted to the mail relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailRelayRequest {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug)]
pub struct NotificationJob {
    pub id: Uuid,
    pub message: NotificationMessage,
}

/// What happened to the notification that follows a committed mutation.
/// Anything other than `Sent` means the mutation succeeded in a degraded way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum NotificationStatus {
    Sent,
    Failed(String),
    TimedOut,
}

impl NotificationStatus {
    pub fn is_delivered(&self) -> bool {
        matches!(self, NotificationStatus::Sent)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Notifier not configured: EMAIL and EMAIL_PASSWORD must both be set")]
    NotConfigured,

    #[error("Mail relay rejected message: {message}")]
    RelayRejected { message: String },

    #[error("Mail relay unreachable: {0}")]
    Transport(String),

    #[error("Notification queue closed")]
    QueueClosed,
}

impl From<reqwest::Error> for NotificationError {
    fn from(e: reqwest::Error) -> Self {
        NotificationError::Transport(e.to_string())
    }
}
