//! Missing-submission scanner.
//!
//! [`SubmissionScanner`] runs as a background task. On every tick it works
//! out the current academic week, checks each active facilitator allocation
//! for a filed activity log, and queues a [`ReminderItem`] for each one that
//! is missing. Repeated scans queue repeated reminders; the existence check
//! is the only de-duplication.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use coursehub_core::types::Timestamp;
use coursehub_core::week::AcademicWeek;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::NotificationError;
use crate::item::{QueueItem, ReminderItem};
use crate::queue::WorkQueue;
use crate::store::NotificationStore;

/// Default period between scans.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Shortest period [`SubmissionScanner::new`] accepts.
pub const MIN_SCAN_INTERVAL: Duration = Duration::from_secs(1);

/// Summary of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// The week scanned, or `None` when the scan was skipped (ISO week 53).
    pub week: Option<AcademicWeek>,
    pub pairs_checked: usize,
    pub reminders_queued: usize,
    /// Pairs whose check or push failed.
    pub failures: usize,
}

// ---------------------------------------------------------------------------
// SubmissionScanner
// ---------------------------------------------------------------------------

pub struct SubmissionScanner {
    store: Arc<dyn NotificationStore>,
    queue: Arc<dyn WorkQueue>,
    interval: Duration,
    scan_on_start: bool,
}

impl SubmissionScanner {
    /// Create a scanner that pushes reminders onto `queue` every `interval`.
    ///
    /// Intervals shorter than [`MIN_SCAN_INTERVAL`] are raised to it.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        queue: Arc<dyn WorkQueue>,
        interval: Duration,
    ) -> Self {
        if interval < MIN_SCAN_INTERVAL {
            tracing::warn!(
                interval_ms = interval.as_millis() as u64,
                "Scan interval too short, using the minimum"
            );
        }
        Self {
            store,
            queue,
            interval: interval.max(MIN_SCAN_INTERVAL),
            scan_on_start: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Scan immediately on [`run`](Self::run) instead of after one interval.
    pub fn scan_on_start(mut self, enabled: bool) -> Self {
        self.scan_on_start = enabled;
        self
    }

    /// Run the scan loop until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let first = if self.scan_on_start {
            Instant::now()
        } else {
            Instant::now() + self.interval
        };
        let mut ticker = tokio::time::interval_at(first, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_secs = self.interval.as_secs(), "Submission scanner started");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.scan_at(Utc::now()).await {
                        tracing::error!(error = %e, "Missing-submission scan failed");
                    }
                }
            }
        }
        tracing::info!("Submission scanner stopped");
    }

    /// Scan once for the academic week containing `now`.
    ///
    /// Fails only when the facilitator list cannot be loaded; per-pair
    /// failures are logged and counted in [`ScanReport::failures`].
    pub async fn scan_at(&self, now: Timestamp) -> Result<ScanReport, NotificationError> {
        let week = match AcademicWeek::containing(now.date_naive()) {
            Ok(week) => week,
            Err(e) => {
                tracing::info!(date = %now.date_naive(), reason = %e, "Scan skipped");
                return Ok(ScanReport::default());
            }
        };

        let facilitators = self.store.list_active_facilitator_allocations().await?;
        let mut report = ScanReport::default();

        for entry in &facilitators {
            for allocation in &entry.allocations {
                report.pairs_checked += 1;
                let item = ReminderItem::new(entry.facilitator.id, allocation.id, &week, now);
                match self.check_pair(item).await {
                    Ok(true) => {
                        report.reminders_queued += 1;
                        tracing::debug!(
                            to = %entry.facilitator.email,
                            allocation_id = allocation.id,
                            %week,
                            "Queued reminder"
                        );
                    }
                    Ok(false) => {}
                    Err(e) => {
                        report.failures += 1;
                        tracing::error!(
                            facilitator_id = entry.facilitator.id,
                            allocation_id = allocation.id,
                            error = %e,
                            "Failed to check submission"
                        );
                    }
                }
            }
        }

        tracing::info!(
            %week,
            pairs_checked = report.pairs_checked,
            reminders_queued = report.reminders_queued,
            failures = report.failures,
            "Missing-submission scan complete"
        );
        report.week = Some(week);
        Ok(report)
    }

    /// Queue `item` unless its log already exists. Returns whether it was queued.
    async fn check_pair(&self, item: ReminderItem) -> Result<bool, NotificationError> {
        let week = AcademicWeek::new(item.week_number, item.academic_year.clone());
        if self
            .store
            .activity_log_exists(item.allocation_id, item.facilitator_id, &week)
            .await?
        {
            return Ok(false);
        }

        let payload = QueueItem::from(item).encode()?;
        self.queue.push(payload).await?;
        Ok(true)
    }
}
