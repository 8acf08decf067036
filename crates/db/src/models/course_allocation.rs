//! Course allocation entity model and DTOs.
//!
//! An allocation assigns one facilitator to teach a course section within a
//! cohort and trimester.

use coursehub_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;

/// A row from the `course_allocations` table.
#[derive(Debug, Clone, FromRow)]
pub struct CourseAllocation {
    pub id: DbId,
    pub course_id: DbId,
    pub facilitator_id: DbId,
    pub cohort_id: DbId,
    /// `HT1`, `HT2` or `FT`.
    pub trimester: String,
    pub intake_period: String,
    /// `online`, `in-person` or `hybrid`.
    pub delivery_mode: String,
    pub class_section: String,
    /// Inactive allocations are excluded from missing-submission scans.
    pub is_active: bool,
    pub assigned_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An allocation joined with its course and cohort labels.
#[derive(Debug, Clone, FromRow)]
pub struct AllocationDetails {
    #[sqlx(flatten)]
    pub allocation: CourseAllocation,
    pub course_code: String,
    pub course_title: String,
    pub cohort_name: String,
}

/// DTO for creating a new allocation.
#[derive(Debug, Deserialize)]
pub struct CreateCourseAllocation {
    pub course_id: DbId,
    pub facilitator_id: DbId,
    pub cohort_id: DbId,
    pub trimester: String,
    pub intake_period: String,
    pub delivery_mode: Option<String>,
    pub class_section: String,
    pub assigned_by: DbId,
}
