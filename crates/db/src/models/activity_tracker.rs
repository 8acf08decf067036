//! Weekly activity log ("activity tracker") model and DTOs.
//!
//! One row per `(allocation_id, week_number, academic_year)`. The presence
//! of a row is what counts as the facilitator having submitted that week.

use coursehub_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;

/// Grading status value meaning the activity is finished.
pub const STATUS_DONE: &str = "Done";
pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_NOT_STARTED: &str = "Not Started";

/// A row from the `activity_trackers` table.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityTracker {
    pub id: DbId,
    pub allocation_id: DbId,
    pub facilitator_id: DbId,
    pub week_number: i32,
    pub academic_year: String,
    /// JSON array with one boolean per day of the week.
    pub attendance_status: serde_json::Value,
    pub formative_one_grading: String,
    pub formative_two_grading: String,
    pub summative_grading: String,
    pub course_moderation: String,
    pub intranet_sync: String,
    pub grade_book_status: String,
    pub additional_notes: Option<String>,
    pub submitted_at: Timestamp,
    pub last_updated_at: Timestamp,
}

impl ActivityTracker {
    fn activities(&self) -> [&str; 6] {
        [
            self.formative_one_grading.as_str(),
            self.formative_two_grading.as_str(),
            self.summative_grading.as_str(),
            self.course_moderation.as_str(),
            self.intranet_sync.as_str(),
            self.grade_book_status.as_str(),
        ]
    }

    pub fn all_activities_completed(&self) -> bool {
        self.activities().iter().all(|s| *s == STATUS_DONE)
    }

    /// Share of the six tracked activities marked `Done`, rounded to a
    /// whole percent.
    pub fn completion_percentage(&self) -> u8 {
        let activities = self.activities();
        let done = activities.iter().filter(|s| **s == STATUS_DONE).count();
        ((done as f64 / activities.len() as f64) * 100.0).round() as u8
    }
}

/// An activity log joined with its allocation's course and cohort labels.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLogDetails {
    #[sqlx(flatten)]
    pub log: ActivityTracker,
    pub course_code: String,
    pub course_title: String,
    pub cohort_name: String,
}

/// DTO for filing a weekly activity log. Omitted statuses default to
/// `Not Started`.
#[derive(Debug, Deserialize)]
pub struct CreateActivityTracker {
    pub allocation_id: DbId,
    pub facilitator_id: DbId,
    pub week_number: i32,
    pub academic_year: String,
    pub attendance_status: serde_json::Value,
    pub formative_one_grading: Option<String>,
    pub formative_two_grading: Option<String>,
    pub summative_grading: Option<String>,
    pub course_moderation: Option<String>,
    pub intranet_sync: Option<String>,
    pub grade_book_status: Option<String>,
    pub additional_notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
