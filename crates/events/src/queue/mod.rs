//! Durable FIFO work queues.
//!
//! Queues carry opaque string payloads (JSON-encoded [`QueueItem`]s). A
//! payload that cannot be processed is moved to the queue's dead-letter
//! list as a [`DeadLetter`] record instead of being dropped.
//!
//! [`QueueItem`]: crate::item::QueueItem

pub mod memory;
pub mod redis;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use coursehub_core::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Errors raised by a queue backend.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A payload that could not be processed, parked for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetter {
    /// Queue the payload was popped from.
    pub queue: String,
    /// The payload exactly as it was received.
    pub payload: String,
    pub error: String,
    pub failed_at: Timestamp,
}

impl DeadLetter {
    pub fn new(queue: impl Into<String>, payload: impl Into<String>, error: impl ToString) -> Self {
        Self {
            queue: queue.into(),
            payload: payload.into(),
            error: error.to_string(),
            failed_at: Utc::now(),
        }
    }
}

/// A named FIFO queue shared between producers and a consumer.
///
/// A successful [`pop`](WorkQueue::pop) removes the item from the queue.
/// Nothing is put back on failure; an item is only seen again if its
/// producer pushes it again.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    fn name(&self) -> &str;

    /// Append a payload to the tail of the queue.
    async fn push(&self, payload: String) -> Result<(), QueueError>;

    /// Remove and return the head of the queue, waiting up to `timeout`
    /// for one to arrive. `Ok(None)` means the wait timed out.
    async fn pop(&self, timeout: Duration) -> Result<Option<String>, QueueError>;

    /// Park an unprocessable payload on the dead-letter list.
    async fn dead_letter(&self, letter: &DeadLetter) -> Result<(), QueueError>;

    /// Number of payloads waiting.
    async fn depth(&self) -> Result<usize, QueueError>;
}
