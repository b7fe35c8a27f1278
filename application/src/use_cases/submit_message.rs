//! Submit message use case
//!
//! The engine's single inbound operation: append to the room's log
//! partition and return immediately. Deliberation happens asynchronously;
//! its outcome is only ever visible through room state queries.

use crate::ports::message_log::{LogError, MessageLog, RecordPayload};
use boardroom_domain::{RecordId, RoomId};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when submitting a message
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Author cannot be empty")]
    EmptyAuthor,

    #[error("Content cannot be empty")]
    EmptyContent,

    #[error("Log error: {0}")]
    Log(#[from] LogError),
}

/// Input for the SubmitMessage use case
#[derive(Debug, Clone)]
pub struct SubmitMessageInput {
    pub room_id: RoomId,
    pub author: String,
    pub content: String,
}

impl SubmitMessageInput {
    pub fn new(
        room_id: impl Into<RoomId>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            author: author.into(),
            content: content.into(),
        }
    }
}

/// Use case for accepting a boardroom message
pub struct SubmitMessageUseCase {
    log: Arc<dyn MessageLog>,
}

impl SubmitMessageUseCase {
    pub fn new(log: Arc<dyn MessageLog>) -> Self {
        Self { log }
    }

    /// Validate and append; never blocks on the deliberation outcome
    pub async fn execute(&self, input: SubmitMessageInput) -> Result<RecordId, SubmitError> {
        if input.author.trim().is_empty() {
            return Err(SubmitError::EmptyAuthor);
        }
        if input.content.trim().is_empty() {
            return Err(SubmitError::EmptyContent);
        }

        let payload = RecordPayload::new(&input.room_id, input.author, input.content);
        let record_id = self.log.append(&input.room_id, payload).await?;
        info!(room = %input.room_id, record = %record_id, "message accepted");
        Ok(record_id)
    }
}
