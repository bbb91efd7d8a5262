//! # In-Memory Result Store
//!
//! Thread-safe in-memory implementation of [`ResultStore`] for tests and
//! development. Queues are `VecDeque`s of raw payloads behind a
//! `tokio::sync::RwLock`, preserving the destructive-read and FIFO semantics
//! of the AMQP store. Message TTL is not simulated.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::error::{BackendError, BackendResult};
use crate::store::ResultStore;
use crate::task::TaskState;

/// In-memory result store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// Queue storage (key -> FIFO payloads)
    queues: RwLock<HashMap<String, VecDeque<Vec<u8>>>>,
    /// Queues currently held by an exclusive drain
    draining: Mutex<HashSet<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw payload, bypassing serialization (for testing malformed
    /// records)
    pub async fn push_raw(&self, key: &str, payload: Vec<u8>) {
        let mut queues = self.queues.write().await;
        queues.entry(key.to_string()).or_default().push_back(payload);
    }

    /// Number of stored payloads for `key` (for test assertions)
    pub async fn depth(&self, key: &str) -> usize {
        let queues = self.queues.read().await;
        queues.get(key).map(VecDeque::len).unwrap_or(0)
    }
}

/// Releases the exclusive drain claim when the drain finishes or aborts
struct DrainClaim<'a> {
    store: &'a InMemoryStore,
    key: String,
}

impl DrainClaim<'_> {
    async fn release(self) {
        let mut draining = self.store.draining.lock().await;
        draining.remove(&self.key);
    }
}

#[async_trait]
impl ResultStore for InMemoryStore {
    async fn publish(
        &self,
        key: &str,
        state: &TaskState,
        _deadline: Option<Duration>,
    ) -> BackendResult<()> {
        let payload = state
            .to_bytes()
            .map_err(|e| BackendError::publish(key, format!("serialize task state: {e}")))?;
        self.push_raw(key, payload).await;
        Ok(())
    }

    async fn read_next(&self, key: &str) -> BackendResult<TaskState> {
        let mut queues = self.queues.write().await;
        // A missing queue reads as empty; polling must not create one
        let payload = queues
            .get_mut(key)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| BackendError::not_ready(key))?;
        drop(queues);

        // The payload is already consumed; malformed records are lost, as
        // with the destructive broker read
        TaskState::from_bytes(&payload)
    }

    async fn inspect_depth(&self, key: &str) -> BackendResult<usize> {
        Ok(self.depth(key).await)
    }

    async fn exclusive_drain(&self, key: &str, expected: usize) -> BackendResult<Vec<TaskState>> {
        {
            let mut draining = self.draining.lock().await;
            if !draining.insert(key.to_string()) {
                return Err(BackendError::resource_busy(
                    key,
                    "exclusive drain already in progress",
                ));
            }
        }
        let claim = DrainClaim {
            store: self,
            key: key.to_string(),
        };

        let mut states = Vec::with_capacity(expected);
        let mut result = Ok(());

        {
            let mut queues = self.queues.write().await;
            for _ in 0..expected {
                let Some(payload) = queues.get_mut(key).and_then(VecDeque::pop_front) else {
                    result = Err(BackendError::channel(format!(
                        "delivery stream for {key} closed early"
                    )));
                    break;
                };
                match TaskState::from_bytes(&payload) {
                    Ok(state) => states.push(state),
                    Err(err) => {
                        result = Err(err);
                        break;
                    }
                }
            }
        }

        claim.release().await;
        result.map(|()| states)
    }

    async fn purge(&self, key: &str) -> BackendResult<()> {
        let mut queues = self.queues.write().await;
        queues.remove(key);
        Ok(())
    }
}
