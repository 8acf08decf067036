use std::str::FromStr;
use std::time::Duration;

use coursehub_events::config::parse_var;
use coursehub_events::{ConfigError, WorkerConfig};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ServiceConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

/// Process-level configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub redis_url: String,
    /// How long to wait for background tasks on shutdown.
    pub shutdown_grace: Duration,
    pub log_format: LogFormat,
    pub worker: WorkerConfig,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                    | Default                  |
    /// |----------------------------|--------------------------|
    /// | `DATABASE_URL`             | required                 |
    /// | `DATABASE_MAX_CONNECTIONS` | `10`                     |
    /// | `REDIS_URL`                | `redis://127.0.0.1:6379` |
    /// | `SHUTDOWN_GRACE_SECS`      | `10`                     |
    /// | `LOG_FORMAT`               | `pretty`                 |
    ///
    /// Queue and scheduling variables are read by [`WorkerConfig::from_env`].
    pub fn from_env() -> Result<Self, ServiceConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ServiceConfigError> {
        let database_url =
            lookup("DATABASE_URL").ok_or(ServiceConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            database_max_connections: parse_var(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            shutdown_grace: Duration::from_secs(parse_var(
                &lookup,
                "SHUTDOWN_GRACE_SECS",
                DEFAULT_SHUTDOWN_GRACE_SECS,
            )?),
            log_format: parse_var(&lookup, "LOG_FORMAT", LogFormat::Pretty)?,
            worker: WorkerConfig::from_lookup(&lookup)?,
        })
    }
}
