#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use coursehub_core::roles::{ROLE_FACILITATOR, ROLE_MANAGER};
use coursehub_core::types::DbId;
use coursehub_core::week::AcademicWeek;
use coursehub_db::models::activity_tracker::{ActivityLogDetails, ActivityTracker, STATUS_DONE, STATUS_PENDING};
use coursehub_db::models::course_allocation::{AllocationDetails, CourseAllocation};
use coursehub_db::models::user::User;
use coursehub_events::{
    DeadLetter, DeliveryError, FacilitatorAllocations, MemoryQueue, MessageTransport,
    NotificationStore, OutboundMessage, QueueError, WorkQueue,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 8, 0, 0).unwrap()
}

fn user(id: DbId, first: &str, last: &str, email: &str, role: &str) -> User {
    User {
        id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        user_role: role.to_string(),
        is_active: true,
        last_login_at: None,
        created_at: ts(2024, 1, 1),
        updated_at: ts(2024, 1, 1),
    }
}

fn connection_refused() -> QueueError {
    QueueError::Redis(redis::RedisError::from((
        redis::ErrorKind::IoError,
        "connection refused",
    )))
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory [`NotificationStore`] with switchable failures.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<BTreeMap<DbId, User>>,
    allocations: Mutex<BTreeMap<DbId, AllocationDetails>>,
    logs: Mutex<BTreeMap<DbId, ActivityLogDetails>>,
    /// Every lookup fails while set.
    fail_lookups: AtomicBool,
    /// `activity_log_exists` fails for these allocation ids.
    fail_exists_for: Mutex<HashSet<DbId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_manager(&self, id: DbId, email: &str) -> User {
        self.insert(user(id, "Morgan", "Manager", email, ROLE_MANAGER))
    }

    pub fn add_facilitator(&self, id: DbId, first: &str, last: &str, email: &str) -> User {
        self.insert(user(id, first, last, email, ROLE_FACILITATOR))
    }

    pub fn deactivate_user(&self, id: DbId) {
        if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
            user.is_active = false;
        }
    }

    fn insert(&self, user: User) -> User {
        self.users.lock().unwrap().insert(user.id, user.clone());
        user
    }

    /// Allocation of course "CS101" in cohort "2024-Spring".
    pub fn add_allocation(&self, id: DbId, facilitator_id: DbId) -> AllocationDetails {
        let details = AllocationDetails {
            allocation: CourseAllocation {
                id,
                course_id: 1,
                facilitator_id,
                cohort_id: 1,
                trimester: "HT1".to_string(),
                intake_period: "2024S".to_string(),
                delivery_mode: "online".to_string(),
                class_section: format!("S{id}"),
                is_active: true,
                assigned_by: 1,
                created_at: ts(2024, 1, 1),
                updated_at: ts(2024, 1, 1),
            },
            course_code: "CS101".to_string(),
            course_title: "Introduction to Computer Science".to_string(),
            cohort_name: "2024-Spring".to_string(),
        };
        self.allocations.lock().unwrap().insert(id, details.clone());
        details
    }

    pub fn deactivate_allocation(&self, id: DbId) {
        if let Some(details) = self.allocations.lock().unwrap().get_mut(&id) {
            details.allocation.is_active = false;
        }
    }

    /// Activity log with three of six activities done.
    pub fn add_log(&self, id: DbId, allocation_id: DbId, week: i32, year: &str) -> ActivityTracker {
        let facilitator_id = self.allocations.lock().unwrap()[&allocation_id]
            .allocation
            .facilitator_id;
        let log = ActivityTracker {
            id,
            allocation_id,
            facilitator_id,
            week_number: week,
            academic_year: year.to_string(),
            attendance_status: serde_json::json!([true, true, false, true, true]),
            formative_one_grading: STATUS_DONE.to_string(),
            formative_two_grading: STATUS_DONE.to_string(),
            summative_grading: STATUS_DONE.to_string(),
            course_moderation: STATUS_PENDING.to_string(),
            intranet_sync: STATUS_PENDING.to_string(),
            grade_book_status: STATUS_PENDING.to_string(),
            additional_notes: None,
            submitted_at: ts(2024, 1, 10),
            last_updated_at: ts(2024, 1, 10),
        };
        self.logs.lock().unwrap().insert(
            id,
            ActivityLogDetails {
                log: log.clone(),
                course_code: "CS101".to_string(),
                course_title: "Introduction to Computer Science".to_string(),
                cohort_name: "2024-Spring".to_string(),
            },
        );
        log
    }

    pub fn remove_log(&self, id: DbId) {
        self.logs.lock().unwrap().remove(&id);
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn fail_exists_for(&self, allocation_id: DbId) {
        self.fail_exists_for.lock().unwrap().insert(allocation_id);
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn find_user(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        self.check()?;
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_allocation(&self, id: DbId) -> Result<Option<AllocationDetails>, sqlx::Error> {
        self.check()?;
        Ok(self.allocations.lock().unwrap().get(&id).cloned())
    }

    async fn find_activity_log(
        &self,
        id: DbId,
    ) -> Result<Option<ActivityLogDetails>, sqlx::Error> {
        self.check()?;
        Ok(self.logs.lock().unwrap().get(&id).cloned())
    }

    async fn list_active_managers(&self) -> Result<Vec<User>, sqlx::Error> {
        self.check()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.is_active && u.user_role == ROLE_MANAGER)
            .cloned()
            .collect())
    }

    async fn list_active_facilitator_allocations(
        &self,
    ) -> Result<Vec<FacilitatorAllocations>, sqlx::Error> {
        self.check()?;
        let users = self.users.lock().unwrap();
        let allocations = self.allocations.lock().unwrap();
        Ok(users
            .values()
            .filter(|u| u.is_active && u.user_role == ROLE_FACILITATOR)
            .filter_map(|facilitator| {
                let owned: Vec<CourseAllocation> = allocations
                    .values()
                    .map(|d| &d.allocation)
                    .filter(|a| a.is_active && a.facilitator_id == facilitator.id)
                    .cloned()
                    .collect();
                (!owned.is_empty()).then(|| FacilitatorAllocations {
                    facilitator: facilitator.clone(),
                    allocations: owned,
                })
            })
            .collect())
    }

    async fn activity_log_exists(
        &self,
        allocation_id: DbId,
        facilitator_id: DbId,
        week: &AcademicWeek,
    ) -> Result<bool, sqlx::Error> {
        self.check()?;
        if self.fail_exists_for.lock().unwrap().contains(&allocation_id) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.logs.lock().unwrap().values().any(|d| {
            d.log.allocation_id == allocation_id
                && d.log.facilitator_id == facilitator_id
                && d.log.week_number == week.week.get() as i32
                && d.log.academic_year == week.year.as_str()
        }))
    }
}

// ---------------------------------------------------------------------------
// RecordingTransport
// ---------------------------------------------------------------------------

/// Captures every message instead of sending it.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutboundMessage>>,
    failures_remaining: AtomicUsize,
    slow_subject: Mutex<Option<(String, Duration)>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` sends.
    pub fn fail_next(&self, count: usize) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Hold each send whose subject contains `fragment` for `delay`.
    pub fn slow_down(&self, fragment: &str, delay: Duration) {
        *self.slow_subject.lock().unwrap() = Some((fragment.to_string(), delay));
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(DeliveryError::Build("transport unavailable".to_string()));
        }
        let delay = self
            .slow_subject
            .lock()
            .unwrap()
            .as_ref()
            .filter(|(fragment, _)| message.subject.contains(fragment.as_str()))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FlakyQueue
// ---------------------------------------------------------------------------

/// A [`MemoryQueue`] whose operations can be made to fail.
pub struct FlakyQueue {
    inner: MemoryQueue,
    pop_failures: AtomicUsize,
    fail_pushes: AtomicBool,
    pops: AtomicUsize,
}

impl FlakyQueue {
    pub fn new(name: &str) -> Self {
        Self {
            inner: MemoryQueue::new(name),
            pop_failures: AtomicUsize::new(0),
            fail_pushes: AtomicBool::new(false),
            pops: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &MemoryQueue {
        &self.inner
    }

    /// Fail the next `count` pops.
    pub fn fail_pops(&self, count: usize) {
        self.pop_failures.store(count, Ordering::SeqCst);
    }

    pub fn fail_pushes(&self, fail: bool) {
        self.fail_pushes.store(fail, Ordering::SeqCst);
    }

    /// Number of pop attempts so far, failed ones included.
    pub fn pops(&self) -> usize {
        self.pops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkQueue for FlakyQueue {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn push(&self, payload: String) -> Result<(), QueueError> {
        if self.fail_pushes.load(Ordering::SeqCst) {
            return Err(connection_refused());
        }
        self.inner.push(payload).await
    }

    async fn pop(&self, timeout: Duration) -> Result<Option<String>, QueueError> {
        self.pops.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .pop_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(connection_refused());
        }
        self.inner.pop(timeout).await
    }

    async fn dead_letter(&self, letter: &DeadLetter) -> Result<(), QueueError> {
        self.inner.dead_letter(letter).await
    }

    async fn depth(&self) -> Result<usize, QueueError> {
        self.inner.depth().await
    }
}
