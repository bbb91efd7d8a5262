//! # Backend Error Types
//!
//! Structured error handling for the result backend using thiserror.
//! Every broker-side failure mode surfaces as a distinct variant; nothing is
//! folded into a stringly-typed catch-all.

use thiserror::Error;

/// Errors surfaced by result backend operations
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Broker connection failed: {message}")]
    Connection { message: String },

    #[error("Channel operation failed: {message}")]
    Channel { message: String },

    #[error("Declare failed: {entity}: {message}")]
    Declare { entity: String, message: String },

    #[error("Channel could not be put into confirm mode: {message}")]
    ConfirmMode { message: String },

    #[error("Publish failed: {routing_key}: {message}")]
    Publish {
        routing_key: String,
        message: String,
    },

    #[error("Publish was not acknowledged by the broker: {routing_key}")]
    Delivery { routing_key: String },

    #[error("Failed to decode stored task state: {message}")]
    Decode { message: String },

    #[error("No state ready for task {task_uuid}")]
    NotReady { task_uuid: String },

    #[error("Group ledger {group_uuid} holds {actual} entries, expected {expected}")]
    InconsistentState {
        group_uuid: String,
        expected: usize,
        actual: usize,
    },

    #[error("Queue {queue_name} is busy: {message}")]
    ResourceBusy {
        queue_name: String,
        message: String,
    },

    #[error("Queue delete failed: {queue_name}: {message}")]
    Delete {
        queue_name: String,
        message: String,
    },
}

impl BackendError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a channel error
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }

    /// Create a declare error for an exchange, queue or binding
    pub fn declare(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Declare {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Create a confirm mode error
    pub fn confirm_mode(message: impl Into<String>) -> Self {
        Self::ConfirmMode {
            message: message.into(),
        }
    }

    /// Create a publish error
    pub fn publish(routing_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            routing_key: routing_key.into(),
            message: message.into(),
        }
    }

    /// Create a delivery error (publish not acknowledged)
    pub fn delivery(routing_key: impl Into<String>) -> Self {
        Self::Delivery {
            routing_key: routing_key.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a not ready error (no message available for the task)
    pub fn not_ready(task_uuid: impl Into<String>) -> Self {
        Self::NotReady {
            task_uuid: task_uuid.into(),
        }
    }

    /// Create an inconsistent state error (ledger count mismatch)
    pub fn inconsistent_state(
        group_uuid: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::InconsistentState {
            group_uuid: group_uuid.into(),
            expected,
            actual,
        }
    }

    /// Create a resource busy error (exclusive-consume conflict)
    pub fn resource_busy(queue_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ResourceBusy {
            queue_name: queue_name.into(),
            message: message.into(),
        }
    }

    /// Create a delete error
    pub fn delete(queue_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delete {
            queue_name: queue_name.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let conn_err = BackendError::connection("dial refused");
        assert!(matches!(conn_err, BackendError::Connection { .. }));

        let declare_err = BackendError::declare("queue t1", "args mismatch");
        assert!(matches!(declare_err, BackendError::Declare { .. }));

        let busy_err = BackendError::resource_busy("g1", "exclusive consumer attached");
        assert!(matches!(busy_err, BackendError::ResourceBusy { .. }));

        let config_err = BackendError::config("RESULTBUS_RESULTS_EXPIRE_IN: not a number");
        assert!(matches!(config_err, BackendError::Config { .. }));
        assert!(format!("{config_err}").starts_with("Invalid configuration"));
    }

    #[test]
    fn test_error_display() {
        let err = BackendError::inconsistent_state("g1", 3, 2);
        let display = format!("{err}");
        assert!(display.contains("g1"));
        assert!(display.contains('3'));
        assert!(display.contains('2'));

        let err = BackendError::not_ready("t1");
        assert!(format!("{err}").contains("No state ready for task t1"));

        let err = BackendError::delivery("t1");
        assert!(format!("{err}").contains("not acknowledged"));
    }

    #[test]
    fn test_declare_carries_entity() {
        let err = BackendError::declare("exchange task_results", "type mismatch");
        assert!(matches!(
            err,
            BackendError::Declare { ref entity, ref message }
                if entity == "exchange task_results" && message == "type mismatch"
        ));
    }

    #[test]
    fn test_delete_carries_queue_name() {
        let err = BackendError::delete("t1", "channel closed");
        assert!(matches!(
            err,
            BackendError::Delete { ref queue_name, .. } if queue_name == "t1"
        ));
    }
}
