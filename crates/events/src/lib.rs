//! Notification dispatch for the course management backend.
//!
//! This crate provides the background machinery that tells facilitators
//! about missing weekly activity logs and tells managers when a log is
//! submitted, updated or deleted:
//!
//! - [`QueueItem`]: the closed set of work items carried by the queues.
//! - [`WorkQueue`]: durable FIFO queue seam, backed by Redis lists
//!   ([`RedisQueue`]) or an in-process buffer ([`MemoryQueue`]).
//! - [`NotificationStore`]: read access to users, allocations and logs.
//! - [`delivery`]: message transports (structured log line, SMTP).
//! - [`SubmissionScanner`]: periodic scan for missing weekly logs.
//! - [`ReminderDispatcher`] / [`AlertDispatcher`]: queue consumers.
//! - [`NotificationWorker`]: supervisor owning the three background tasks.
//! - [`AlertPublisher`]: producer hook for the activity log CRUD layer.

pub mod config;
pub mod delivery;
pub mod dispatch;
pub mod error;
pub mod item;
pub mod publisher;
pub mod queue;
pub mod render;
pub mod scanner;
pub mod store;
pub mod worker;

pub use config::{ConfigError, WorkerConfig};
pub use delivery::email::{EmailConfig, EmailTransport};
pub use delivery::log::LogTransport;
pub use delivery::{DeliveryError, MessageKind, MessageTransport, OutboundMessage};
pub use dispatch::alert::AlertDispatcher;
pub use dispatch::reminder::ReminderDispatcher;
pub use dispatch::{DispatchOutcome, DispatchSettings, SkipReason};
pub use error::NotificationError;
pub use item::{AlertAction, AlertItem, QueueItem, ReminderItem};
pub use publisher::AlertPublisher;
pub use queue::memory::MemoryQueue;
pub use queue::redis::RedisQueue;
pub use queue::{DeadLetter, QueueError, WorkQueue};
pub use scanner::{ScanReport, SubmissionScanner};
pub use store::{FacilitatorAllocations, NotificationStore, PgNotificationStore};
pub use worker::NotificationWorker;
