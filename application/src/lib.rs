//! Application layer for boardroom
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod retry;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{CheckpointParams, EngineConfig, IntakeParams, LockParams, RoomParams};
pub use ports::{
    agent_pool::{AgentError, AgentPool, DeliberationContext, Deliberator},
    checkpoint_store::{CheckpointError, CheckpointStore},
    message_log::{DeadLetter, LogError, LogRecord, MessageLog, PendingRecord, RecordPayload},
    metrics::{MetricsSink, NoMetrics, metric},
    room_lock::{AcquireOutcome, LockError, RenewOutcome, RoomLease, RoomLockCoordinator},
};
pub use retry::Backoff;
pub use use_cases::checkpoint_manager::CheckpointManager;
pub use use_cases::intake::{IntakeConsumer, IntakeError, PollSummary};
pub use use_cases::room_state::{GetRoomStateUseCase, RoomStateError};
pub use use_cases::run_deliberation::{DeliberationError, RunDeliberationUseCase};
pub use use_cases::submit_message::{SubmitError, SubmitMessageInput, SubmitMessageUseCase};
