//! Repository for the `cohorts` table.

use sqlx::PgPool;

use crate::models::cohort::{Cohort, CreateCohort};

const COLUMNS: &str = "id, cohort_name, start_date, end_date, is_active, created_at, updated_at";

pub struct CohortRepo;

impl CohortRepo {
    pub async fn create(pool: &PgPool, input: &CreateCohort) -> Result<Cohort, sqlx::Error> {
        let query = format!(
            "INSERT INTO cohorts (cohort_name, start_date, end_date)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cohort>(&query)
            .bind(&input.cohort_name)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }
}
