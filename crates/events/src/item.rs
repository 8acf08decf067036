//! Work items carried by the notification queues.
//!
//! Items travel as self-describing JSON records: a `kind` tag plus a
//! camelCase payload, e.g.
//!
//! ```json
//! {"kind":"alert","action":"submitted","logId":42,"facilitatorId":7,
//!  "weekNumber":2,"academicYear":"2024","enqueuedAt":"2024-01-10T09:00:00Z"}
//! ```
//!
//! Every field is required. Week and year are validated while decoding, so
//! a payload that decodes is well-formed.

use std::fmt;

use coursehub_core::types::{DbId, Timestamp};
use coursehub_core::week::{AcademicWeek, AcademicYear, WeekNumber};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// QueueItem
// ---------------------------------------------------------------------------

/// Any item that can sit on a notification queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueueItem {
    Reminder(ReminderItem),
    Alert(AlertItem),
}

impl QueueItem {
    /// Decode a raw queue payload.
    pub fn decode(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Encode for pushing onto a queue.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The `kind` tag as written on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Reminder(_) => "reminder",
            Self::Alert(_) => "alert",
        }
    }
}

// ---------------------------------------------------------------------------
// ReminderItem
// ---------------------------------------------------------------------------

/// A facilitator has not filed the activity log for an allocation and week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderItem {
    pub facilitator_id: DbId,
    pub allocation_id: DbId,
    pub week_number: WeekNumber,
    pub academic_year: AcademicYear,
    pub enqueued_at: Timestamp,
}

impl ReminderItem {
    pub fn new(
        facilitator_id: DbId,
        allocation_id: DbId,
        week: &AcademicWeek,
        enqueued_at: Timestamp,
    ) -> Self {
        Self {
            facilitator_id,
            allocation_id,
            week_number: week.week,
            academic_year: week.year.clone(),
            enqueued_at,
        }
    }
}

impl TryFrom<QueueItem> for ReminderItem {
    type Error = QueueItem;

    fn try_from(item: QueueItem) -> Result<Self, Self::Error> {
        match item {
            QueueItem::Reminder(reminder) => Ok(reminder),
            other => Err(other),
        }
    }
}

impl From<ReminderItem> for QueueItem {
    fn from(item: ReminderItem) -> Self {
        Self::Reminder(item)
    }
}

// ---------------------------------------------------------------------------
// AlertItem
// ---------------------------------------------------------------------------

/// Lifecycle event on an activity log that managers are told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertAction {
    Submitted,
    Updated,
    Deleted,
}

impl AlertAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }

    /// Title-case form used in message subjects.
    pub fn capitalized(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Updated => "Updated",
            Self::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An activity log was submitted, updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertItem {
    pub action: AlertAction,
    pub log_id: DbId,
    pub facilitator_id: DbId,
    pub week_number: WeekNumber,
    pub academic_year: AcademicYear,
    pub enqueued_at: Timestamp,
}

impl TryFrom<QueueItem> for AlertItem {
    type Error = QueueItem;

    fn try_from(item: QueueItem) -> Result<Self, Self::Error> {
        match item {
            QueueItem::Alert(alert) => Ok(alert),
            other => Err(other),
        }
    }
}

impl From<AlertItem> for QueueItem {
    fn from(item: AlertItem) -> Self {
        Self::Alert(item)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
