use coursehub_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub id: DbId,
    pub course_code: String,
    pub course_title: String,
    pub course_description: Option<String>,
    pub credit_hours: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateCourse {
    pub course_code: String,
    pub course_title: String,
    pub course_description: Option<String>,
    pub credit_hours: i32,
}
