#![allow(clippy::doc_markdown)] // Allow technical terms like RabbitMQ, UUIDs in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections

//! # resultbus
//!
//! AMQP-backed task result tracking and group completion for distributed
//! task pipelines.
//!
//! ## Overview
//!
//! Workers record task state transitions (PENDING → RECEIVED → STARTED →
//! SUCCESS/FAILURE) through this crate, and orchestrators poll it for
//! single-task status and group completion. The only persistence substrate
//! is a message broker: each task gets a mailbox queue holding its ordered
//! transition history, and each group gets a ledger queue receiving one
//! entry per successful member. Reads are destructive — consuming a message
//! removes it — which is what makes a queue usable as a status store at all,
//! and what shapes every contract in this API.
//!
//! ## Module Organization
//!
//! - [`backend`] - Entry points: state publishing, reads, group completion
//! - [`store`] - The mailbox/ledger storage seam and its AMQP and in-memory
//!   engines
//! - [`task`] - Wire types: `TaskState`, `TaskStatus`, `TaskSignature`
//! - [`config`] - Explicit broker configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Tracing initialization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resultbus::{AmqpBackend, AmqpConfig, TaskResult, TaskSignature};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = AmqpBackend::from_config(AmqpConfig::from_env()?);
//!
//! let signature = TaskSignature::new("t1").with_group("g1", 2);
//! backend.set_state_started(&signature).await?;
//! backend
//!     .set_state_success(&signature, TaskResult::new("int64", 42.into()))
//!     .await?;
//!
//! if backend.group_completed("g1", 2).await? {
//!     let states = backend.group_task_states("g1", 2).await?;
//!     println!("group finished with {} states", states.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency Model
//!
//! Every operation dials a fresh broker connection and channel and releases
//! both before returning; nothing is pooled and no channel is shared across
//! concurrent logical operations. The broker is the sole synchronization
//! point: group drains take a broker-enforced exclusive consumer, and there
//! are no in-process locks.

pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod task;

pub use backend::{AmqpBackend, ResultBackend};
pub use config::AmqpConfig;
pub use error::{BackendError, BackendResult};
pub use store::{AmqpStore, InMemoryStore, ResultStore};
pub use task::{TaskResult, TaskSignature, TaskState, TaskStatus};
