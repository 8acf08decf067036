//! Shared domain primitives for the course management backend.

pub mod error;
pub mod queues;
pub mod roles;
pub mod types;
pub mod week;
