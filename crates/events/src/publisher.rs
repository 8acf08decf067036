//! Producer hook for the activity log CRUD layer.
//!
//! Handlers call [`AlertPublisher::publish`] after a log is created, updated
//! or deleted. Publishing is fire-and-forget: a failure is logged and never
//! fails the request that triggered it.

use std::sync::Arc;

use chrono::Utc;
use coursehub_core::week::{AcademicYear, WeekNumber};
use coursehub_db::models::activity_tracker::ActivityTracker;

use crate::error::NotificationError;
use crate::item::{AlertAction, AlertItem, QueueItem};
use crate::queue::WorkQueue;

#[derive(Clone)]
pub struct AlertPublisher {
    queue: Arc<dyn WorkQueue>,
}

impl AlertPublisher {
    pub fn new(queue: Arc<dyn WorkQueue>) -> Self {
        Self { queue }
    }

    /// Queue a manager alert for `action` on `log`.
    pub async fn publish(&self, log: &ActivityTracker, action: AlertAction) {
        match self.try_publish(log, action).await {
            Ok(()) => tracing::info!(log_id = log.id, %action, "Queued manager alert"),
            Err(e) => tracing::error!(
                log_id = log.id,
                %action,
                error = %e,
                "Failed to queue manager alert"
            ),
        }
    }

    async fn try_publish(
        &self,
        log: &ActivityTracker,
        action: AlertAction,
    ) -> Result<(), NotificationError> {
        let item = AlertItem {
            action,
            log_id: log.id,
            facilitator_id: log.facilitator_id,
            week_number: WeekNumber::try_from(log.week_number)?,
            academic_year: AcademicYear::new(log.academic_year.as_str())?,
            enqueued_at: Utc::now(),
        };

        let payload = QueueItem::from(item).encode()?;
        self.queue.push(payload).await?;
        Ok(())
    }
}
