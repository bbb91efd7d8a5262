//! # Result Store Abstraction
//!
//! The mailbox/ledger access seam. Both queue kinds — per-task mailboxes and
//! per-group ledgers — are driven through this trait so a real storage engine
//! can later replace the broker-only implementation without touching the
//! backend's callers.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BackendResult;
use crate::task::TaskState;

mod amqp;
mod in_memory;

pub use amqp::AmqpStore;
pub use in_memory::InMemoryStore;

/// Storage operations over per-entity queues keyed by task or group UUID
///
/// Queues are created lazily on first access and treated as shared,
/// store-owned state: no caller holds long-lived ownership of one.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Append a state record to the queue named `key`, waiting for the store
    /// to durably accept it. `deadline` bounds that wait; `None` blocks
    /// indefinitely.
    async fn publish(
        &self,
        key: &str,
        state: &TaskState,
        deadline: Option<Duration>,
    ) -> BackendResult<()>;

    /// Destructively read the oldest unread record from the queue named
    /// `key`. Fails with `NotReady` when the queue is empty. A malformed
    /// record is consumed regardless and surfaces as `Decode`.
    async fn read_next(&self, key: &str) -> BackendResult<TaskState>;

    /// Number of unread records in the queue named `key`, without consuming
    /// any of them.
    async fn inspect_depth(&self, key: &str) -> BackendResult<usize>;

    /// Drain exactly `expected` records under an exclusive claim on the
    /// queue. A concurrent drain of the same queue fails with
    /// `ResourceBusy`. Aborts with `Decode` on the first malformed record.
    /// Returns records in arrival order.
    async fn exclusive_drain(&self, key: &str, expected: usize) -> BackendResult<Vec<TaskState>>;

    /// Unconditionally delete the queue named `key`, destroying any unread
    /// records.
    async fn purge(&self, key: &str) -> BackendResult<()>;
}
