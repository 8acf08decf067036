//! In-process [`WorkQueue`] for tests and single-binary deployments.
//!
//! Nothing survives a restart.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use super::{DeadLetter, QueueError, WorkQueue};

pub struct MemoryQueue {
    name: String,
    items: Mutex<VecDeque<String>>,
    dead_letters: Mutex<Vec<DeadLetter>>,
    available: Notify,
}

impl MemoryQueue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Mutex::new(VecDeque::new()),
            dead_letters: Mutex::new(Vec::new()),
            available: Notify::new(),
        }
    }

    /// Payloads currently waiting, head first.
    pub async fn snapshot(&self) -> Vec<String> {
        self.items.lock().await.iter().cloned().collect()
    }

    /// Everything parked on the dead-letter list so far.
    pub async fn dead_letters(&self) -> Vec<DeadLetter> {
        self.dead_letters.lock().await.clone()
    }
}

#[async_trait]
impl WorkQueue for MemoryQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn push(&self, payload: String) -> Result<(), QueueError> {
        self.items.lock().await.push_back(payload);
        self.available.notify_one();
        Ok(())
    }

    async fn pop(&self, timeout: Duration) -> Result<Option<String>, QueueError> {
        let deadline = Instant::now() + timeout;
        loop {
            let available = self.available.notified();
            if let Some(payload) = self.items.lock().await.pop_front() {
                return Ok(Some(payload));
            }
            if tokio::time::timeout_at(deadline, available).await.is_err() {
                return Ok(None);
            }
        }
    }

    async fn dead_letter(&self, letter: &DeadLetter) -> Result<(), QueueError> {
        self.dead_letters.lock().await.push(letter.clone());
        Ok(())
    }

    async fn depth(&self) -> Result<usize, QueueError> {
        Ok(self.items.lock().await.len())
    }
}
