//! # Result Backend
//!
//! Entry points exposed to the surrounding task framework: state transition
//! publishing, single-task state reads, group completion detection, chord
//! gating and cleanup. All queue access goes through the [`ResultStore`]
//! seam; the AMQP store is the default engine.
//!
//! Group completion rests on the ledger queue: every task that reaches
//! SUCCESS and carries a group UUID appends its final state there, and the
//! ledger's depth is the sole signal of how many members have succeeded.
//! Failed tasks are never appended — a group with a failed member never
//! completes. That is a deliberate limitation of the design, not an
//! oversight to patch here.

use std::time::Duration;

use crate::error::{BackendError, BackendResult};
use crate::store::{AmqpStore, ResultStore};
use crate::task::{TaskResult, TaskSignature, TaskState};

/// Result backend over a pluggable store
#[derive(Debug)]
pub struct ResultBackend<S> {
    store: S,
    confirm_deadline: Option<Duration>,
}

/// The broker-backed backend used in production
pub type AmqpBackend = ResultBackend<AmqpStore>;

impl<S: ResultStore> ResultBackend<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            confirm_deadline: None,
        }
    }

    /// Bound every publish-confirmation wait by `deadline`
    ///
    /// Without this the backend blocks until the broker answers, exactly as
    /// the framework has always behaved; a stalled broker then hangs the
    /// caller indefinitely.
    pub fn with_confirm_deadline(mut self, deadline: Duration) -> Self {
        self.confirm_deadline = Some(deadline);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a group before its tasks run
    ///
    /// No-op: only the success count is tracked, never membership, so there
    /// is nothing to record. A caller that needs to know which UUIDs are
    /// outstanding must track them itself.
    pub async fn init_group(&self, _group_uuid: &str, _task_uuids: &[String]) -> BackendResult<()> {
        Ok(())
    }

    /// Record a PENDING transition
    pub async fn set_state_pending(&self, signature: &TaskSignature) -> BackendResult<()> {
        self.update_state(&TaskState::pending(signature)).await
    }

    /// Record a RECEIVED transition
    pub async fn set_state_received(&self, signature: &TaskSignature) -> BackendResult<()> {
        self.update_state(&TaskState::received(signature)).await
    }

    /// Record a STARTED transition
    pub async fn set_state_started(&self, signature: &TaskSignature) -> BackendResult<()> {
        self.update_state(&TaskState::started(signature)).await
    }

    /// Record a SUCCESS transition and, for group members, append the state
    /// to the group's ledger
    pub async fn set_state_success(
        &self,
        signature: &TaskSignature,
        result: TaskResult,
    ) -> BackendResult<()> {
        let state = TaskState::success(signature, result);
        self.update_state(&state).await?;

        match signature.group() {
            Some(group_uuid) => self.mark_task_success(group_uuid, signature, &state).await,
            None => Ok(()),
        }
    }

    /// Record a FAILURE transition
    ///
    /// Failures go only to the task's mailbox, never to the group ledger.
    pub async fn set_state_failure(
        &self,
        signature: &TaskSignature,
        error: impl Into<String> + Send,
    ) -> BackendResult<()> {
        self.update_state(&TaskState::failure(signature, error)).await
    }

    /// Destructively read the oldest unread transition for a task
    ///
    /// Sequential calls drain the task's history oldest-first. A caller
    /// wanting "current status" must either consume every transition as it
    /// is written or accept that earlier transitions are discarded once
    /// read. This is the binding contract of the queue-backed store, not an
    /// accident.
    pub async fn get_state(&self, task_uuid: &str) -> BackendResult<TaskState> {
        self.store.read_next(task_uuid).await
    }

    /// Whether every task in the group has succeeded
    ///
    /// True iff the ledger depth equals `expected_count` exactly. Nothing is
    /// consumed. Since failed tasks never reach the ledger, this only turns
    /// true when all members finished successfully.
    pub async fn group_completed(
        &self,
        group_uuid: &str,
        expected_count: usize,
    ) -> BackendResult<bool> {
        let depth = self.store.inspect_depth(group_uuid).await?;
        Ok(depth == expected_count)
    }

    /// Retrieve the final states of all tasks in a completed group
    ///
    /// Single-shot: the ledger is inspected first and the drain only
    /// proceeds when its depth equals `expected_count`; afterwards the
    /// ledger is empty and its queue eligible for broker auto-deletion. A
    /// concurrent drain of the same group fails with `ResourceBusy`. States
    /// come back in arrival order, which is the order the successes were
    /// published.
    pub async fn group_task_states(
        &self,
        group_uuid: &str,
        expected_count: usize,
    ) -> BackendResult<Vec<TaskState>> {
        let depth = self.store.inspect_depth(group_uuid).await?;
        if depth != expected_count {
            return Err(BackendError::inconsistent_state(
                group_uuid,
                expected_count,
                depth,
            ));
        }

        self.store.exclusive_drain(group_uuid, expected_count).await
    }

    /// Whether the caller should run the group's chord callback
    ///
    /// Always grants permission: no at-most-once claim is implemented, so
    /// two workers observing completion simultaneously will both be told to
    /// proceed. Callers relying on exactly-once chord execution must supply
    /// their own idempotence.
    pub async fn trigger_chord(&self, group_uuid: &str) -> BackendResult<bool> {
        tracing::debug!(group_uuid, "chord trigger requested; no claim is taken");
        Ok(true)
    }

    /// Delete a task's mailbox, destroying any unread history
    pub async fn purge_state(&self, task_uuid: &str) -> BackendResult<()> {
        self.store.purge(task_uuid).await
    }

    /// Delete a group's ledger, destroying any unread entries
    pub async fn purge_group_meta(&self, group_uuid: &str) -> BackendResult<()> {
        self.store.purge(group_uuid).await
    }

    async fn update_state(&self, state: &TaskState) -> BackendResult<()> {
        tracing::debug!(
            task_uuid = %state.task_uuid,
            status = ?state.status,
            "recording task state transition"
        );
        self.store
            .publish(&state.task_uuid, state, self.confirm_deadline)
            .await
    }

    async fn mark_task_success(
        &self,
        group_uuid: &str,
        signature: &TaskSignature,
        state: &TaskState,
    ) -> BackendResult<()> {
        // Without an expected count the ledger depth could never be
        // interpreted, so the append is skipped entirely
        if signature.group_task_count.unwrap_or(0) == 0 {
            return Ok(());
        }

        tracing::debug!(
            group_uuid,
            task_uuid = %state.task_uuid,
            "appending success to group ledger"
        );
        self.store
            .publish(group_uuid, state, self.confirm_deadline)
            .await
    }
}

impl AmqpBackend {
    /// Convenience constructor: an AMQP-backed backend from configuration
    pub fn from_config(config: crate::config::AmqpConfig) -> Self {
        let confirm_deadline = config.confirm_deadline;
        let backend = Self::new(AmqpStore::new(config));
        match confirm_deadline {
            Some(deadline) => backend.with_confirm_deadline(deadline),
            None => backend,
        }
    }
}
