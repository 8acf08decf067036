//! Read access to the records the notification pipeline needs.
//!
//! [`NotificationStore`] is the seam between the background tasks and the
//! database; [`PgNotificationStore`] implements it over the
//! `coursehub_db` repositories.

use std::collections::HashMap;

use async_trait::async_trait;
use coursehub_core::roles::{ROLE_FACILITATOR, ROLE_MANAGER};
use coursehub_core::types::DbId;
use coursehub_core::week::AcademicWeek;
use coursehub_db::models::activity_tracker::ActivityLogDetails;
use coursehub_db::models::course_allocation::{AllocationDetails, CourseAllocation};
use coursehub_db::models::user::User;
use coursehub_db::repositories::{ActivityTrackerRepo, CourseAllocationRepo, UserRepo};
use coursehub_db::DbPool;

/// An active facilitator and their active allocations.
#[derive(Debug, Clone)]
pub struct FacilitatorAllocations {
    pub facilitator: User,
    pub allocations: Vec<CourseAllocation>,
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn find_user(&self, id: DbId) -> Result<Option<User>, sqlx::Error>;

    async fn find_allocation(&self, id: DbId) -> Result<Option<AllocationDetails>, sqlx::Error>;

    async fn find_activity_log(&self, id: DbId)
        -> Result<Option<ActivityLogDetails>, sqlx::Error>;

    /// Active users with the manager role.
    async fn list_active_managers(&self) -> Result<Vec<User>, sqlx::Error>;

    /// Active facilitators that hold at least one active allocation.
    async fn list_active_facilitator_allocations(
        &self,
    ) -> Result<Vec<FacilitatorAllocations>, sqlx::Error>;

    /// Whether the facilitator has filed a log for `allocation_id` in `week`.
    async fn activity_log_exists(
        &self,
        allocation_id: DbId,
        facilitator_id: DbId,
        week: &AcademicWeek,
    ) -> Result<bool, sqlx::Error>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PgNotificationStore {
    pool: DbPool,
}

impl PgNotificationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn find_user(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        UserRepo::find_by_id(&self.pool, id).await
    }

    async fn find_allocation(&self, id: DbId) -> Result<Option<AllocationDetails>, sqlx::Error> {
        CourseAllocationRepo::find_details(&self.pool, id).await
    }

    async fn find_activity_log(
        &self,
        id: DbId,
    ) -> Result<Option<ActivityLogDetails>, sqlx::Error> {
        ActivityTrackerRepo::find_details(&self.pool, id).await
    }

    async fn list_active_managers(&self) -> Result<Vec<User>, sqlx::Error> {
        UserRepo::list_active_by_role(&self.pool, ROLE_MANAGER).await
    }

    async fn list_active_facilitator_allocations(
        &self,
    ) -> Result<Vec<FacilitatorAllocations>, sqlx::Error> {
        let facilitators = UserRepo::list_active_by_role(&self.pool, ROLE_FACILITATOR).await?;
        let allocations = CourseAllocationRepo::list_active_for_active_facilitators(&self.pool).await?;

        let mut by_facilitator: HashMap<DbId, Vec<CourseAllocation>> = HashMap::new();
        for allocation in allocations {
            by_facilitator
                .entry(allocation.facilitator_id)
                .or_default()
                .push(allocation);
        }

        Ok(facilitators
            .into_iter()
            .filter_map(|facilitator| {
                by_facilitator
                    .remove(&facilitator.id)
                    .map(|allocations| FacilitatorAllocations { facilitator, allocations })
            })
            .collect())
    }

    async fn activity_log_exists(
        &self,
        allocation_id: DbId,
        facilitator_id: DbId,
        week: &AcademicWeek,
    ) -> Result<bool, sqlx::Error> {
        ActivityTrackerRepo::exists_for_week(
            &self.pool,
            allocation_id,
            facilitator_id,
            week.week.get() as i32,
            week.year.as_str(),
        )
        .await
    }
}
