use chrono::NaiveDate;
use coursehub_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;

/// A row from the `cohorts` table.
#[derive(Debug, Clone, FromRow)]
pub struct Cohort {
    pub id: DbId,
    pub cohort_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateCohort {
    pub cohort_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
