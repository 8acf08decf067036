//! Notification worker supervisor.
//!
//! [`NotificationWorker`] owns the lifecycle of the three background tasks:
//! the reminder dispatcher, the alert dispatcher and the submission scanner.
//! All three share one [`CancellationToken`] per run.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::dispatch::alert::AlertDispatcher;
use crate::dispatch::reminder::ReminderDispatcher;
use crate::scanner::SubmissionScanner;

enum WorkerState {
    Stopped,
    Running {
        cancel: CancellationToken,
        tasks: Vec<JoinHandle<()>>,
    },
    /// Cancelled but not yet joined; the dispatchers may still be in their
    /// last queue pop.
    Stopping { tasks: Vec<JoinHandle<()>> },
}

pub struct NotificationWorker {
    reminders: Arc<ReminderDispatcher>,
    alerts: Arc<AlertDispatcher>,
    scanner: Arc<SubmissionScanner>,
    state: Mutex<WorkerState>,
}

impl NotificationWorker {
    pub fn new(
        reminders: ReminderDispatcher,
        alerts: AlertDispatcher,
        scanner: SubmissionScanner,
    ) -> Self {
        Self {
            reminders: Arc::new(reminders),
            alerts: Arc::new(alerts),
            scanner: Arc::new(scanner),
            state: Mutex::new(WorkerState::Stopped),
        }
    }

    /// Spawn the background tasks and return immediately.
    ///
    /// Calling `start` on a running worker logs and does nothing. After a
    /// [`stop`](Self::stop), the previous run's tasks are awaited first so
    /// each queue never has more than one consumer.
    pub async fn start(&self) {
        let mut state = self.state.lock().await;
        match std::mem::replace(&mut *state, WorkerState::Stopped) {
            running @ WorkerState::Running { .. } => {
                *state = running;
                tracing::info!("Notification worker is already running");
                return;
            }
            WorkerState::Stopping { tasks } => {
                tracing::info!("Waiting for the previous run to finish before starting");
                join_all(tasks).await;
            }
            WorkerState::Stopped => {}
        }

        let cancel = CancellationToken::new();
        let tasks = vec![
            {
                let reminders = Arc::clone(&self.reminders);
                let cancel = cancel.clone();
                tokio::spawn(async move { reminders.run(cancel).await })
            },
            {
                let alerts = Arc::clone(&self.alerts);
                let cancel = cancel.clone();
                tokio::spawn(async move { alerts.run(cancel).await })
            },
            {
                let scanner = Arc::clone(&self.scanner);
                let cancel = cancel.clone();
                tokio::spawn(async move { scanner.run(cancel).await })
            },
        ];

        *state = WorkerState::Running { cancel, tasks };
        tracing::info!("Notification worker started");
    }

    /// Signal the tasks to stop without waiting for them.
    ///
    /// Each loop exits at its next cancellation check; a dispatcher blocked
    /// in a queue pop notices within one pop timeout. The handles are kept
    /// so a later [`start`](Self::start) or [`shutdown`](Self::shutdown)
    /// can wait for them.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        *state = match std::mem::replace(&mut *state, WorkerState::Stopped) {
            WorkerState::Running { cancel, tasks } => {
                cancel.cancel();
                tracing::info!("Notification worker stopping");
                WorkerState::Stopping { tasks }
            }
            other => other,
        };
    }

    /// Stop and wait up to `grace` for the tasks to finish, aborting any
    /// that are still running afterwards.
    pub async fn shutdown(&self, grace: Duration) {
        let tasks = {
            let mut state = self.state.lock().await;
            match std::mem::replace(&mut *state, WorkerState::Stopped) {
                WorkerState::Running { cancel, tasks } => {
                    cancel.cancel();
                    tasks
                }
                WorkerState::Stopping { tasks } => tasks,
                WorkerState::Stopped => return,
            }
        };
        tracing::info!(grace_secs = grace.as_secs(), "Notification worker shutting down");

        let aborts: Vec<_> = tasks.iter().map(JoinHandle::abort_handle).collect();
        if tokio::time::timeout(grace, join_all(tasks)).await.is_err() {
            tracing::warn!("Notification tasks did not stop within the grace period, aborting");
            for handle in &aborts {
                handle.abort();
            }
        } else {
            tracing::info!("Notification worker stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        matches!(*self.state.lock().await, WorkerState::Running { .. })
    }
}

async fn join_all(tasks: Vec<JoinHandle<()>>) {
    for task in tasks {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Notification task ended abnormally");
        }
    }
}
