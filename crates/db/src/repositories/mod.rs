//! Data access for every table, one repository per entity.

pub mod activity_tracker_repo;
pub mod cohort_repo;
pub mod course_allocation_repo;
pub mod course_repo;
pub mod user_repo;

pub use activity_tracker_repo::ActivityTrackerRepo;
pub use cohort_repo::CohortRepo;
pub use course_allocation_repo::CourseAllocationRepo;
pub use course_repo::CourseRepo;
pub use user_repo::UserRepo;
