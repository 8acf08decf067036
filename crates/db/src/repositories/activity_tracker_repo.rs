//! Repository for the `activity_trackers` table.

use coursehub_core::types::DbId;
use sqlx::PgPool;

use crate::models::activity_tracker::{
    ActivityLogDetails, ActivityTracker, CreateActivityTracker, STATUS_NOT_STARTED,
};

/// Column list for `activity_trackers` queries, qualified with the `al` alias.
const COLUMNS: &str = "al.id, al.allocation_id, al.facilitator_id, al.week_number, \
                       al.academic_year, al.attendance_status, al.formative_one_grading, \
                       al.formative_two_grading, al.summative_grading, al.course_moderation, \
                       al.intranet_sync, al.grade_book_status, al.additional_notes, \
                       al.submitted_at, al.last_updated_at";

pub struct ActivityTrackerRepo;

impl ActivityTrackerRepo {
    /// File a weekly activity log, returning the created row.
    ///
    /// Fails with a unique violation if a log already exists for the same
    /// allocation, week and academic year.
    pub async fn create(
        pool: &PgPool,
        input: &CreateActivityTracker,
    ) -> Result<ActivityTracker, sqlx::Error> {
        let status = |s: &Option<String>| s.clone().unwrap_or_else(|| STATUS_NOT_STARTED.into());
        let query = format!(
            "INSERT INTO activity_trackers AS al
                (allocation_id, facilitator_id, week_number, academic_year, attendance_status,
                 formative_one_grading, formative_two_grading, summative_grading,
                 course_moderation, intranet_sync, grade_book_status, additional_notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityTracker>(&query)
            .bind(input.allocation_id)
            .bind(input.facilitator_id)
            .bind(input.week_number)
            .bind(&input.academic_year)
            .bind(&input.attendance_status)
            .bind(status(&input.formative_one_grading))
            .bind(status(&input.formative_two_grading))
            .bind(status(&input.summative_grading))
            .bind(status(&input.course_moderation))
            .bind(status(&input.intranet_sync))
            .bind(status(&input.grade_book_status))
            .bind(&input.additional_notes)
            .fetch_one(pool)
            .await
    }

    /// Find a log with its allocation's course code/title and cohort name.
    pub async fn find_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ActivityLogDetails>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, c.course_code, c.course_title, co.cohort_name \
             FROM activity_trackers al \
             JOIN course_allocations ca ON ca.id = al.allocation_id \
             JOIN courses c ON c.id = ca.course_id \
             JOIN cohorts co ON co.id = ca.cohort_id \
             WHERE al.id = $1"
        );
        sqlx::query_as::<_, ActivityLogDetails>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `facilitator_id` has filed a log for `allocation_id` in the
    /// given week.
    pub async fn exists_for_week(
        pool: &PgPool,
        allocation_id: DbId,
        facilitator_id: DbId,
        week_number: i32,
        academic_year: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS ( \
                SELECT 1 FROM activity_trackers \
                WHERE allocation_id = $1 AND facilitator_id = $2 \
                  AND week_number = $3 AND academic_year = $4 \
             )",
        )
        .bind(allocation_id)
        .bind(facilitator_id)
        .bind(week_number)
        .bind(academic_year)
        .fetch_one(pool)
        .await
    }

    /// Delete a log. Returns the deleted row, or `None` if it did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<ActivityTracker>, sqlx::Error> {
        let query =
            format!("DELETE FROM activity_trackers AS al WHERE al.id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, ActivityTracker>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
