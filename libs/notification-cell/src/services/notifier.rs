use async_trait::async_trait;

use crate::models::NotificationError;

/// Outbound channel to a patient. Implementations deliver one message and
/// report success or failure; they never retry.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotificationError>;
}
