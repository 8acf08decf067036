#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Week number {0} is outside 1..=52")]
    InvalidWeek(i64),

    #[error("Academic year must be a 4-digit year, got {0:?}")]
    InvalidAcademicYear(String),
}
