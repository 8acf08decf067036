//! Repository for the `courses` table.

use sqlx::PgPool;

use crate::models::course::{Course, CreateCourse};

const COLUMNS: &str = "id, course_code, course_title, course_description, credit_hours, \
                       is_active, created_at, updated_at";

pub struct CourseRepo;

impl CourseRepo {
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (course_code, course_title, course_description, credit_hours)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.course_code)
            .bind(&input.course_title)
            .bind(&input.course_description)
            .bind(input.credit_hours)
            .fetch_one(pool)
            .await
    }
}
