//! Queue consumers that turn work items into delivered messages.
//!
//! Both dispatchers share one loop: pop with a bounded wait, decode, hand
//! the typed item to the dispatcher, and on error log and back off. The loop
//! checks for cancellation before every pop instead of racing the pop, so an
//! item already removed from the queue is always processed.

pub mod alert;
pub mod reminder;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use coursehub_core::types::DbId;
use tokio_util::sync::CancellationToken;

use crate::error::NotificationError;
use crate::item::QueueItem;
use crate::queue::{DeadLetter, WorkQueue};

/// Default bounded wait for one queue pop.
pub const DEFAULT_POP_TIMEOUT: Duration = Duration::from_secs(5);

/// Default pause after a failed iteration.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    pub pop_timeout: Duration,
    pub backoff: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            pop_timeout: DEFAULT_POP_TIMEOUT,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of one dispatcher iteration that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The pop timed out with nothing queued.
    Idle,
    /// The message was handed to the transport.
    Sent { recipients: usize },
    /// The item referenced something that no longer exists; it was dropped.
    Skipped(SkipReason),
    /// The payload was unprocessable and moved to the dead-letter list.
    DeadLettered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    FacilitatorNotFound(DbId),
    AllocationNotFound(DbId),
    ActivityLogNotFound(DbId),
    NoActiveManagers,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FacilitatorNotFound(id) => write!(f, "facilitator {id} not found"),
            Self::AllocationNotFound(id) => write!(f, "allocation {id} not found"),
            Self::ActivityLogNotFound(id) => write!(f, "activity log {id} not found"),
            Self::NoActiveManagers => f.write_str("no active managers"),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared loop
// ---------------------------------------------------------------------------

#[async_trait]
pub(crate) trait Handler: Send + Sync {
    type Item: TryFrom<QueueItem, Error = QueueItem> + Send;

    /// Dispatcher name for log fields.
    const LABEL: &'static str;

    fn queue(&self) -> &dyn WorkQueue;

    fn settings(&self) -> &DispatchSettings;

    async fn process(&self, item: Self::Item) -> Result<DispatchOutcome, NotificationError>;
}

/// Pop and process at most one item.
pub(crate) async fn dispatch_next<H: Handler>(
    handler: &H,
) -> Result<DispatchOutcome, NotificationError> {
    let queue = handler.queue();
    let Some(payload) = queue.pop(handler.settings().pop_timeout).await? else {
        return Ok(DispatchOutcome::Idle);
    };

    let item = match QueueItem::decode(&payload) {
        Ok(item) => item,
        Err(e) => return dead_letter(queue, payload, e.to_string()).await,
    };

    match H::Item::try_from(item) {
        Ok(item) => handler.process(item).await,
        Err(other) => {
            let error = format!("unexpected {} item for {} dispatcher", other.kind(), H::LABEL);
            dead_letter(queue, payload, error).await
        }
    }
}

async fn dead_letter(
    queue: &dyn WorkQueue,
    payload: String,
    error: String,
) -> Result<DispatchOutcome, NotificationError> {
    let letter = DeadLetter::new(queue.name(), payload, error);
    queue.dead_letter(&letter).await?;
    tracing::warn!(
        queue = queue.name(),
        error = %letter.error,
        "Unprocessable payload moved to dead-letter queue"
    );
    Ok(DispatchOutcome::DeadLettered)
}

/// Run [`dispatch_next`] until `cancel` fires.
pub(crate) async fn run_loop<H: Handler>(handler: &H, cancel: CancellationToken) {
    let backoff = handler.settings().backoff;
    tracing::info!(dispatcher = H::LABEL, queue = handler.queue().name(), "Dispatcher started");

    while !cancel.is_cancelled() {
        if let Err(e) = dispatch_next(handler).await {
            tracing::error!(dispatcher = H::LABEL, error = %e, "Dispatch failed, backing off");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(backoff) => {}
            }
        }
    }

    tracing::info!(dispatcher = H::LABEL, "Dispatcher stopped");
}
