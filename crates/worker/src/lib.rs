//! Process bootstrap for the notification worker.

pub mod config;
pub mod telemetry;
