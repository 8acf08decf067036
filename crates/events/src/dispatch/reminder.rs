//! Facilitator reminder dispatcher.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use super::{DispatchOutcome, DispatchSettings, Handler, SkipReason};
use crate::delivery::MessageTransport;
use crate::error::NotificationError;
use crate::item::ReminderItem;
use crate::queue::WorkQueue;
use crate::render;
use crate::store::NotificationStore;

/// Consumes the reminder queue and messages facilitators about missing logs.
pub struct ReminderDispatcher {
    store: Arc<dyn NotificationStore>,
    queue: Arc<dyn WorkQueue>,
    transport: Arc<dyn MessageTransport>,
    settings: DispatchSettings,
}

impl ReminderDispatcher {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        queue: Arc<dyn WorkQueue>,
        transport: Arc<dyn MessageTransport>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            store,
            queue,
            transport,
            settings,
        }
    }

    /// Pop and process at most one reminder.
    pub async fn dispatch_next(&self) -> Result<DispatchOutcome, NotificationError> {
        super::dispatch_next(self).await
    }

    /// Resolve, render and send one reminder.
    pub async fn handle(&self, item: ReminderItem) -> Result<DispatchOutcome, NotificationError> {
        let Some(facilitator) = self.store.find_user(item.facilitator_id).await? else {
            return Ok(skip(&item, SkipReason::FacilitatorNotFound(item.facilitator_id)));
        };
        let Some(allocation) = self.store.find_allocation(item.allocation_id).await? else {
            return Ok(skip(&item, SkipReason::AllocationNotFound(item.allocation_id)));
        };

        let message = render::reminder_message(&facilitator, &allocation, &item, Utc::now());
        self.transport.send(&message).await?;

        tracing::info!(
            facilitator_id = item.facilitator_id,
            allocation_id = item.allocation_id,
            week = %item.week_number,
            to = %facilitator.email,
            "Reminder sent"
        );
        Ok(DispatchOutcome::Sent { recipients: 1 })
    }

    /// Consume the queue until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        super::run_loop(self, cancel).await
    }
}

fn skip(item: &ReminderItem, reason: SkipReason) -> DispatchOutcome {
    tracing::info!(
        facilitator_id = item.facilitator_id,
        allocation_id = item.allocation_id,
        reason = %reason,
        "Reminder skipped"
    );
    DispatchOutcome::Skipped(reason)
}

#[async_trait]
impl Handler for ReminderDispatcher {
    type Item = ReminderItem;

    const LABEL: &'static str = "reminder";

    fn queue(&self) -> &dyn WorkQueue {
        self.queue.as_ref()
    }

    fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    async fn process(&self, item: ReminderItem) -> Result<DispatchOutcome, NotificationError> {
        self.handle(item).await
    }
}
