// libs/notification-cell/src/services/dispatcher.rs
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::models::{NotificationError, NotificationJob, NotificationMessage, NotificationStatus};
use crate::services::notifier::Notifier;

const QUEUE_CAPACITY: usize = 256;

struct Envelope {
    job: NotificationJob,
    reply: Option<oneshot::Sender<Result<(), NotificationError>>>,
}

/// Outbound notification queue drained by a background worker task.
///
/// Callers enqueue a message and optionally wait a bounded time for the
/// delivery result. A job that outlives the caller's wait keeps running on
/// the worker; only the report degrades to `TimedOut`.
#[derive(Clone)]
pub struct NotificationDispatcher {
    queue: mpsc::Sender<Envelope>,
    timeout: Duration,
}

impl NotificationDispatcher {
    /// Starts the worker on the current tokio runtime.
    pub fn spawn(notifier: Arc<dyn Notifier>, send_timeout: Duration) -> Self {
        let (queue, receiver) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(worker_loop(notifier, receiver, send_timeout));

        Self {
            queue,
            timeout: send_timeout,
        }
    }

    /// Enqueues `message` and waits for the delivery result. Waiting for queue
    /// space and waiting for the worker share one timeout.
    pub async fn dispatch(&self, message: NotificationMessage) -> NotificationStatus {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job = NotificationJob {
            id: Uuid::new_v4(),
            message,
        };
        let job_id = job.id;

        let delivery = async {
            if self.queue.send(Envelope { job, reply: Some(reply_tx) }).await.is_err() {
                error!("Notification queue closed, dropping job {}", job_id);
                return Err(NotificationError::QueueClosed);
            }

            reply_rx
                .await
                .map_err(|_| NotificationError::QueueClosed)
                .and_then(|result| result)
        };

        match timeout(self.timeout, delivery).await {
            Ok(Ok(())) => NotificationStatus::Sent,
            Ok(Err(e)) => NotificationStatus::Failed(e.to_string()),
            Err(_) => {
                warn!("Notification job {} still pending after {:?}", job_id, self.timeout);
                NotificationStatus::TimedOut
            }
        }
    }

    /// Enqueues `message` without waiting for the result.
    pub fn dispatch_detached(&self, message: NotificationMessage) -> Result<Uuid, NotificationError> {
        let job = NotificationJob {
            id: Uuid::new_v4(),
            message,
        };
        let job_id = job.id;

        self.queue
            .try_send(Envelope { job, reply: None })
            .map_err(|_| NotificationError::QueueClosed)?;

        debug!("Queued detached notification job {}", job_id);
        Ok(job_id)
    }
}

#[instrument(skip_all)]
async fn worker_loop(
    notifier: Arc<dyn Notifier>,
    mut receiver: mpsc::Receiver<Envelope>,
    send_timeout: Duration,
) {
    info!("Notification worker started");

    while let Some(Envelope { job, reply }) = receiver.recv().await {
        let NotificationJob { id, message } = job;
        debug!("Processing notification job {} for {}", id, message.recipient);

        let result = match timeout(
            send_timeout,
            notifier.notify(&message.recipient, &message.subject, &message.body),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(NotificationError::Transport(format!(
                "delivery took longer than {:?}",
                send_timeout
            ))),
        };

        if let Err(e) = &result {
            error!("Notification job {} to {} failed: {}", id, message.recipient, e);
        }

        if let Some(reply) = reply {
            // The caller may have stopped waiting; the outcome is already logged.
            let _ = reply.send(result);
        }
    }

    info!("Notification worker stopped");
}
