//! Notification worker configuration.

use std::str::FromStr;
use std::time::Duration;

use coursehub_core::queues::{QUEUE_FACILITATOR_REMINDERS, QUEUE_MANAGER_NOTIFICATIONS};

use crate::dispatch::{DispatchSettings, DEFAULT_BACKOFF, DEFAULT_POP_TIMEOUT};
use crate::scanner::DEFAULT_SCAN_INTERVAL;

/// An environment variable held a value that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{var} has invalid value {value:?}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

/// Settings for the queues, dispatchers and scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub reminder_queue: String,
    pub alert_queue: String,
    /// Bounded wait for one blocking queue pop.
    pub pop_timeout: Duration,
    /// Pause after a failed dispatcher iteration.
    pub backoff: Duration,
    pub scan_interval: Duration,
    /// Run the first scan at start instead of one interval later.
    pub scan_on_start: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            reminder_queue: QUEUE_FACILITATOR_REMINDERS.to_string(),
            alert_queue: QUEUE_MANAGER_NOTIFICATIONS.to_string(),
            pop_timeout: DEFAULT_POP_TIMEOUT,
            backoff: DEFAULT_BACKOFF,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            scan_on_start: false,
        }
    }
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `REMINDER_QUEUE`                | `facilitator_reminders` |
    /// | `ALERT_QUEUE`                   | `manager_notifications` |
    /// | `QUEUE_POP_TIMEOUT_SECS`        | `5`                     |
    /// | `DISPATCH_BACKOFF_SECS`         | `5`                     |
    /// | `SUBMISSION_SCAN_INTERVAL_SECS` | `86400`                 |
    /// | `SUBMISSION_SCAN_ON_START`      | `false`                 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            reminder_queue: lookup("REMINDER_QUEUE").unwrap_or(defaults.reminder_queue),
            alert_queue: lookup("ALERT_QUEUE").unwrap_or(defaults.alert_queue),
            pop_timeout: secs(&lookup, "QUEUE_POP_TIMEOUT_SECS", defaults.pop_timeout)?,
            backoff: secs(&lookup, "DISPATCH_BACKOFF_SECS", defaults.backoff)?,
            scan_interval: secs(&lookup, "SUBMISSION_SCAN_INTERVAL_SECS", defaults.scan_interval)?,
            scan_on_start: parse_var(&lookup, "SUBMISSION_SCAN_ON_START", defaults.scan_on_start)?,
        })
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            pop_timeout: self.pop_timeout,
            backoff: self.backoff,
        }
    }
}

/// Parse `var` through `lookup`, or return `default` when it is unset.
pub fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError { var, value }),
    }
}

/// Whole seconds; zero is rejected because every duration here paces a loop.
fn secs(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_var(lookup, var, default.as_secs())?;
    if secs == 0 {
        return Err(ConfigError {
            var,
            value: "0".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<WorkerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WorkerConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config, WorkerConfig::default());
        assert_eq!(config.reminder_queue, "facilitator_reminders");
        assert_eq!(config.alert_queue, "manager_notifications");
        assert_eq!(config.scan_interval, Duration::from_secs(86_400));
        assert_eq!(config.dispatch_settings(), DispatchSettings::default());
    }

    #[test]
    fn overrides_from_variables() {
        let config = load(&[
            ("ALERT_QUEUE", "staging_alerts"),
            ("QUEUE_POP_TIMEOUT_SECS", "2"),
            ("SUBMISSION_SCAN_INTERVAL_SECS", "3600"),
            ("SUBMISSION_SCAN_ON_START", "true"),
        ])
        .unwrap();
        assert_eq!(config.alert_queue, "staging_alerts");
        assert_eq!(config.pop_timeout, Duration::from_secs(2));
        assert_eq!(config.scan_interval, Duration::from_secs(3600));
        assert!(config.scan_on_start);
    }

    #[test]
    fn parse_var_trims_and_falls_back_to_default() {
        let lookup = |var: &str| (var == "PORT").then(|| " 8025 ".to_string());
        assert_eq!(parse_var(&lookup, "PORT", 25_u16).unwrap(), 8025);
        assert_eq!(parse_var(&lookup, "UNSET", 25_u16).unwrap(), 25);
    }

    #[test]
    fn rejects_unparseable_and_zero_durations() {
        assert_matches!(
            load(&[("DISPATCH_BACKOFF_SECS", "soon")]),
            Err(ConfigError { var: "DISPATCH_BACKOFF_SECS", .. })
        );
        assert_matches!(
            load(&[("QUEUE_POP_TIMEOUT_SECS", "0")]),
            Err(ConfigError { var: "QUEUE_POP_TIMEOUT_SECS", .. })
        );
        assert!(load(&[("SUBMISSION_SCAN_ON_START", "yes")]).is_err());
    }
}
