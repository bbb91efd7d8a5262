//! # Task State Data Model
//!
//! Wire types for task state transitions: the status enum, the state record
//! published to per-task mailboxes and group ledgers, and the signature that
//! identifies a task and its optional group membership.
//!
//! Payloads are JSON. Callers are expected to publish states in PENDING →
//! RECEIVED → STARTED → SUCCESS/FAILURE order, but this layer is a pure
//! transport/ledger: it does not validate ordering or terminality.

use serde::{Deserialize, Serialize};

use crate::error::{BackendError, BackendResult};

/// Lifecycle status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Received,
    Started,
    Success,
    Failure,
}

impl TaskStatus {
    /// Whether the status is terminal (SUCCESS or FAILURE)
    pub fn is_finished(&self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failure)
    }
}

/// Opaque result value produced by a successful task
///
/// The `kind` tag describes the value's type to consumers that cannot infer
/// it from the JSON representation alone (e.g. int64 vs float64).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: serde_json::Value,
}

impl TaskResult {
    pub fn new(kind: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }
}

/// A single task state transition record
///
/// `result` is present only on SUCCESS, `error` only on FAILURE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskState {
    pub task_uuid: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskState {
    /// PENDING state for a task
    pub fn pending(signature: &TaskSignature) -> Self {
        Self::bare(signature, TaskStatus::Pending)
    }

    /// RECEIVED state for a task
    pub fn received(signature: &TaskSignature) -> Self {
        Self::bare(signature, TaskStatus::Received)
    }

    /// STARTED state for a task
    pub fn started(signature: &TaskSignature) -> Self {
        Self::bare(signature, TaskStatus::Started)
    }

    /// SUCCESS state carrying the task's result
    pub fn success(signature: &TaskSignature, result: TaskResult) -> Self {
        Self {
            task_uuid: signature.task_uuid.clone(),
            status: TaskStatus::Success,
            result: Some(result),
            error: None,
        }
    }

    /// FAILURE state carrying the error description
    pub fn failure(signature: &TaskSignature, error: impl Into<String>) -> Self {
        Self {
            task_uuid: signature.task_uuid.clone(),
            status: TaskStatus::Failure,
            result: None,
            error: Some(error.into()),
        }
    }

    fn bare(signature: &TaskSignature, status: TaskStatus) -> Self {
        Self {
            task_uuid: signature.task_uuid.clone(),
            status,
            result: None,
            error: None,
        }
    }

    /// Serialize to the JSON wire payload
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from the JSON wire payload
    pub fn from_bytes(bytes: &[u8]) -> BackendResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| BackendError::decode(e.to_string()))
    }
}

/// Identifies a task and, optionally, the group it belongs to
///
/// `group_task_count` is the authoritative expected size of the group. It is
/// supplied by whichever call happens to carry it; nothing persists it
/// centrally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSignature {
    pub task_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_task_count: Option<usize>,
}

impl TaskSignature {
    pub fn new(task_uuid: impl Into<String>) -> Self {
        Self {
            task_uuid: task_uuid.into(),
            group_uuid: None,
            group_task_count: None,
        }
    }

    pub fn with_group(mut self, group_uuid: impl Into<String>, group_task_count: usize) -> Self {
        self.group_uuid = Some(group_uuid.into());
        self.group_task_count = Some(group_task_count);
        self
    }

    /// The group UUID, treating an empty string as absent
    pub fn group(&self) -> Option<&str> {
        self.group_uuid.as_deref().filter(|g| !g.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Failure).unwrap(),
            "\"FAILURE\""
        );
        let status: TaskStatus = serde_json::from_str("\"STARTED\"").unwrap();
        assert_eq!(status, TaskStatus::Started);
    }

    #[test]
    fn test_status_is_finished() {
        assert!(TaskStatus::Success.is_finished());
        assert!(TaskStatus::Failure.is_finished());
        assert!(!TaskStatus::Pending.is_finished());
        assert!(!TaskStatus::Started.is_finished());
    }

    #[test]
    fn test_success_state_roundtrip() {
        let sig = TaskSignature::new("t1").with_group("g1", 2);
        let state = TaskState::success(&sig, TaskResult::new("int64", serde_json::json!(42)));

        let bytes = state.to_bytes().unwrap();
        let decoded = TaskState::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, state);
        assert_eq!(decoded.result.unwrap().value, serde_json::json!(42));
    }

    #[test]
    fn test_bare_states_omit_result_and_error() {
        let sig = TaskSignature::new("t1");
        let state = TaskState::pending(&sig);
        let json = String::from_utf8(state.to_bytes().unwrap()).unwrap();
        assert!(!json.contains("result"));
        assert!(!json.contains("error"));
        assert!(json.contains("PENDING"));
    }

    #[test]
    fn test_failure_state_carries_error() {
        let sig = TaskSignature::new("t1");
        let state = TaskState::failure(&sig, "boom");
        assert_eq!(state.status, TaskStatus::Failure);
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(state.result.is_none());
    }

    #[test]
    fn test_from_bytes_rejects_malformed_payload() {
        let err = TaskState::from_bytes(b"{not json").unwrap_err();
        assert!(matches!(err, BackendError::Decode { .. }));
    }

    #[test]
    fn test_signature_group_treats_empty_as_absent() {
        let mut sig = TaskSignature::new("t1");
        assert_eq!(sig.group(), None);

        sig.group_uuid = Some(String::new());
        assert_eq!(sig.group(), None);

        sig.group_uuid = Some("g1".to_string());
        assert_eq!(sig.group(), Some("g1"));
    }
}
