pub mod activity_tracker;
pub mod cohort;
pub mod course;
pub mod course_allocation;
pub mod user;
