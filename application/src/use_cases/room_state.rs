//! Room state query
//!
//! Exposes the latest committed deliberation state for a room. This is how
//! deliberation outcomes (including `degraded` and `escalated`) surface to
//! callers; `submitMessage` never reports them synchronously.

use crate::ports::checkpoint_store::{CheckpointError, CheckpointStore};
use boardroom_domain::{DeliberationState, RoomId};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when querying room state
#[derive(Error, Debug)]
pub enum RoomStateError {
    #[error("Room {0} not found")]
    NotFound(RoomId),

    #[error("Persistence error: {0}")]
    Persistence(#[from] CheckpointError),
}

/// Use case for reading a room's latest committed state
pub struct GetRoomStateUseCase {
    store: Arc<dyn CheckpointStore>,
}

impl GetRoomStateUseCase {
    pub fn new(store: Arc<dyn CheckpointStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, room: &RoomId) -> Result<DeliberationState, RoomStateError> {
        self.store
            .restore(room)
            .await?
            .map(|checkpoint| checkpoint.into_state())
            .ok_or_else(|| RoomStateError::NotFound(room.clone()))
    }
}
