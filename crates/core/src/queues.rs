//! Well-known work queue names.
//!
//! Producers and consumers must agree on these; deployments may override
//! them through `REMINDER_QUEUE` / `ALERT_QUEUE`.

/// Reminders for facilitators with a missing weekly activity log.
pub const QUEUE_FACILITATOR_REMINDERS: &str = "facilitator_reminders";

/// Alerts for managers about activity log lifecycle events.
pub const QUEUE_MANAGER_NOTIFICATIONS: &str = "manager_notifications";

/// Suffix appended to a queue name to form its dead-letter list.
pub const DEAD_LETTER_SUFFIX: &str = ":dead_letter";

/// Name of the dead-letter list for `queue`.
pub fn dead_letter_queue(queue: &str) -> String {
    format!("{queue}{DEAD_LETTER_SUFFIX}")
}
