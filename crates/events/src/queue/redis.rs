//! Redis list backed [`WorkQueue`].
//!
//! Producers `RPUSH` onto the list and the consumer `BLPOP`s from the head,
//! giving FIFO order. Dead letters go to `{name}:dead_letter`.
//!
//! A blocking pop holds its connection for the whole wait, so each consumer
//! should own its own `RedisQueue` rather than share one with producers.

use std::time::Duration;

use async_trait::async_trait;
use coursehub_core::queues::dead_letter_queue;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{DeadLetter, QueueError, WorkQueue};

pub struct RedisQueue {
    name: String,
    dead_letter_name: String,
    conn: ConnectionManager,
}

impl RedisQueue {
    /// Open a dedicated managed connection for queue `name`.
    pub async fn connect(client: &redis::Client, name: impl Into<String>) -> Result<Self, QueueError> {
        let conn = client.get_connection_manager().await?;
        Ok(Self::with_connection(conn, name))
    }

    pub fn with_connection(conn: ConnectionManager, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            dead_letter_name: dead_letter_queue(&name),
            name,
            conn,
        }
    }
}

#[async_trait]
impl WorkQueue for RedisQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn push(&self, payload: String) -> Result<(), QueueError> {
        let mut conn = self.conn.clone();
        let _: () = conn.rpush(&self.name, payload).await?;
        Ok(())
    }

    async fn pop(&self, timeout: Duration) -> Result<Option<String>, QueueError> {
        let mut conn = self.conn.clone();
        let popped: Option<(String, String)> =
            conn.blpop(&self.name, timeout.as_secs_f64()).await?;
        Ok(popped.map(|(_, payload)| payload))
    }

    async fn dead_letter(&self, letter: &DeadLetter) -> Result<(), QueueError> {
        let record = serde_json::to_string(letter)?;
        let mut conn = self.conn.clone();
        let _: () = conn.rpush(&self.dead_letter_name, record).await?;
        Ok(())
    }

    async fn depth(&self) -> Result<usize, QueueError> {
        let mut conn = self.conn.clone();
        let len: usize = conn.llen(&self.name).await?;
        Ok(len)
    }
}
