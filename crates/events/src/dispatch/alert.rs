//! Manager alert dispatcher.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use super::{DispatchOutcome, DispatchSettings, Handler, SkipReason};
use crate::delivery::MessageTransport;
use crate::error::NotificationError;
use crate::item::AlertItem;
use crate::queue::WorkQueue;
use crate::render;
use crate::store::NotificationStore;

/// Consumes the alert queue and messages every active manager.
pub struct AlertDispatcher {
    store: Arc<dyn NotificationStore>,
    queue: Arc<dyn WorkQueue>,
    transport: Arc<dyn MessageTransport>,
    settings: DispatchSettings,
}

impl AlertDispatcher {
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

    /// Pop and process at most one alert.
    pub async fn dispatch_next(&self) -> Result<DispatchOutcome, NotificationError> {
        super::dispatch_next(self).await
    }

    /// Resolve, render and send one alert.
    ///
    /// A `deleted` alert normally resolves to [`SkipReason::ActivityLogNotFound`]
    /// because the log row is gone by the time the alert is consumed.
    pub async fn handle(&self, item: AlertItem) -> Result<DispatchOutcome, NotificationError> {
        let Some(facilitator) = self.store.find_user(item.facilitator_id).await? else {
            return Ok(skip(&item, SkipReason::FacilitatorNotFound(item.facilitator_id)));
        };
        let Some(log) = self.store.find_activity_log(item.log_id).await? else {
            return Ok(skip(&item, SkipReason::ActivityLogNotFound(item.log_id)));
        };
        let managers = self.store.list_active_managers().await?;
        if managers.is_empty() {
            return Ok(skip(&item, SkipReason::NoActiveManagers));
        }

        let message = render::alert_message(&facilitator, &log, &managers, &item, Utc::now());
        self.transport.send(&message).await?;

        tracing::info!(
            log_id = item.log_id,
            action = %item.action,
            week = %item.week_number,
            recipients = managers.len(),
            "Alert sent"
        );
        Ok(DispatchOutcome::Sent {
            recipients: managers.len(),
        })
    }

    /// Consume the queue until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        super::run_loop(self, cancel).await
    }
}

fn skip(item: &AlertItem, reason: SkipReason) -> DispatchOutcome {
    tracing::info!(
        log_id = item.log_id,
        action = %item.action,
        reason = %reason,
        "Alert skipped"
    );
    DispatchOutcome::Skipped(reason)
}

#[async_trait]
impl Handler for AlertDispatcher {
    type Item = AlertItem;

    const LABEL: &'static str = "alert";

    fn queue(&self) -> &dyn WorkQueue {
        self.queue.as_ref()
    }

    fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    async fn process(&self, item: AlertItem) -> Result<DispatchOutcome, NotificationError> {
        self.handle(item).await
    }
}
