//! Error type shared by the scanner, dispatchers and publisher.

use coursehub_core::error::CoreError;

use crate::delivery::DeliveryError;
use crate::queue::QueueError;

/// A failure while scanning, dispatching or publishing a notification.
///
/// Every variant is treated as transient by the background loops: it is
/// logged and the loop carries on after its backoff.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Payload encoding error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Invalid notification field: {0}")]
    InvalidField(#[from] CoreError),
}
