//! Repository for the `course_allocations` table.

use coursehub_core::roles::ROLE_FACILITATOR;
use coursehub_core::types::DbId;
use sqlx::PgPool;

use crate::models::course_allocation::{
    AllocationDetails, CourseAllocation, CreateCourseAllocation,
};

/// Column list for `course_allocations` queries, qualified with the `ca` alias.
const COLUMNS: &str = "ca.id, ca.course_id, ca.facilitator_id, ca.cohort_id, ca.trimester, \
                       ca.intake_period, ca.delivery_mode, ca.class_section, ca.is_active, \
                       ca.assigned_by, ca.created_at, ca.updated_at";

/// Default delivery mode when the caller does not pick one.
const DEFAULT_DELIVERY_MODE: &str = "in-person";

pub struct CourseAllocationRepo;

impl CourseAllocationRepo {
    /// Insert a new allocation, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCourseAllocation,
    ) -> Result<CourseAllocation, sqlx::Error> {
        let query = format!(
            "INSERT INTO course_allocations AS ca
                (course_id, facilitator_id, cohort_id, trimester, intake_period,
                 delivery_mode, class_section, assigned_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CourseAllocation>(&query)
            .bind(input.course_id)
            .bind(input.facilitator_id)
            .bind(input.cohort_id)
            .bind(&input.trimester)
            .bind(&input.intake_period)
            .bind(input.delivery_mode.as_deref().unwrap_or(DEFAULT_DELIVERY_MODE))
            .bind(&input.class_section)
            .bind(input.assigned_by)
            .fetch_one(pool)
            .await
    }

    /// Find an allocation with its course code/title and cohort name.
    pub async fn find_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AllocationDetails>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, c.course_code, c.course_title, co.cohort_name \
             FROM course_allocations ca \
             JOIN courses c ON c.id = ca.course_id \
             JOIN cohorts co ON co.id = ca.cohort_id \
             WHERE ca.id = $1"
        );
        sqlx::query_as::<_, AllocationDetails>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every active allocation whose facilitator is an active user with
    /// the facilitator role, ordered by facilitator then allocation id.
    pub async fn list_active_for_active_facilitators(
        pool: &PgPool,
    ) -> Result<Vec<CourseAllocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM course_allocations ca \
             JOIN users u ON u.id = ca.facilitator_id \
             WHERE ca.is_active = true AND u.is_active = true AND u.user_role = $1 \
             ORDER BY ca.facilitator_id, ca.id"
        );
        sqlx::query_as::<_, CourseAllocation>(&query)
            .bind(ROLE_FACILITATOR)
            .fetch_all(pool)
            .await
    }

    /// Set `is_active = false`. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE course_allocations SET is_active = false, updated_at = NOW() \
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
