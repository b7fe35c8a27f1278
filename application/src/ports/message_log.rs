//! Message log port
//!
//! Wraps a durable, partitioned, append-only log with consumer-group
//! semantics. The log guarantees at-least-once delivery per group and
//! nothing stronger; deduplication is the intake consumer's job. Appends
//! are durable before `append` returns.

use async_trait::async_trait;
use boardroom_domain::{Author, IncomingMessage, RecordId, RoomId};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur at the log boundary
#[derive(Error, Debug)]
pub enum LogError {
    /// The log is temporarily unreachable; callers retry with backoff
    #[error("Log unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown record {0}")]
    UnknownRecord(RecordId),

    #[error("Payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LogError {
    /// Check whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, LogError::Unavailable(_))
    }
}

/// Inbound record payload, as appended to a room's partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPayload {
    pub author: String,
    pub content: String,
    pub room_id: String,
}

impl RecordPayload {
    pub fn new(
        room_id: &RoomId,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
            room_id: room_id.as_str().to_string(),
        }
    }
}

/// A record delivered from a room's partition
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub id: RecordId,
    pub payload: RecordPayload,
}

impl LogRecord {
    /// Materialize the domain message this record carries
    pub fn to_message(&self, room_id: &RoomId) -> Option<IncomingMessage> {
        let author = Author::try_new(self.payload.author.as_str())?;
        Some(IncomingMessage::new(
            self.id,
            room_id.clone(),
            author,
            self.payload.content.as_str(),
        ))
    }
}

/// A delivered-but-unacknowledged record eligible for redelivery
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRecord {
    pub record: LogRecord,
    /// Times this record has been delivered to the group (including the
    /// first delivery)
    pub delivery_count: u32,
}

/// A record routed aside for human triage after repeated failures
#[derive(Debug, Clone, PartialEq)]
pub struct DeadLetter {
    pub record: LogRecord,
    pub reason: String,
    pub at_ms: u64,
}

/// Durable partitioned log with consumer groups
///
/// One partition per room; record ids are monotonic within a partition.
/// Consumer groups are created on first read.
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Append a payload to the room's partition; durable before returning
    async fn append(&self, room: &RoomId, payload: RecordPayload) -> Result<RecordId, LogError>;

    /// Read up to `max_count` records not yet delivered to this group
    async fn read_group(
        &self,
        room: &RoomId,
        group: &str,
        consumer: &str,
        max_count: usize,
    ) -> Result<Vec<LogRecord>, LogError>;

    /// Acknowledge a delivered record for the group
    async fn ack(&self, room: &RoomId, group: &str, record_id: RecordId) -> Result<(), LogError>;

    /// List (and re-claim) records delivered to the group but unacked for at
    /// least `min_idle`; each call bumps their delivery counts
    async fn pending(
        &self,
        room: &RoomId,
        group: &str,
        min_idle: Duration,
    ) -> Result<Vec<PendingRecord>, LogError>;

    /// Route a record to the room's dead-letter partition
    async fn dead_letter(
        &self,
        room: &RoomId,
        record: &LogRecord,
        reason: &str,
    ) -> Result<(), LogError>;

    /// List dead-lettered records for triage
    async fn dead_letters(&self, room: &RoomId) -> Result<Vec<DeadLetter>, LogError>;
}
