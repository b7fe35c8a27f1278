//! In-memory checkpoint store
//!
//! Assigns gapless per-room sequence numbers and keeps every checkpoint
//! until pruned. Suitable for tests and single-process deployments that do
//! not need restart recovery.

use async_trait::async_trait;
use boardroom_application::ports::checkpoint_store::{CheckpointError, CheckpointStore};
use boardroom_domain::{Checkpoint, DeliberationState, RoomId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Converts a lock poison error to a store error.
fn poison_err<T>(_: PoisonError<T>) -> CheckpointError {
    CheckpointError::Unavailable("checkpoint lock poisoned".to_string())
}

/// In-memory checkpoint store
#[derive(Debug, Default)]
pub struct InMemoryCheckpointStore {
    rooms: RwLock<HashMap<RoomId, Vec<Checkpoint>>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of retained checkpoints for a room
    pub fn checkpoint_count(&self, room: &RoomId) -> usize {
        self.rooms
            .read()
            .map(|rooms| rooms.get(room).map(Vec::len).unwrap_or(0))
            .unwrap_or(0)
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn commit(&self, state: &DeliberationState) -> Result<u64, CheckpointError> {
        let mut rooms = self.rooms.write().map_err(poison_err)?;
        let checkpoints = rooms.entry(state.room_id().clone()).or_default();
        let sequence = checkpoints.last().map(Checkpoint::sequence).unwrap_or(0) + 1;
        checkpoints.push(Checkpoint::new(state.clone(), sequence));
        drop(rooms);
        Ok(sequence)
    }

    async fn restore(&self, room: &RoomId) -> Result<Option<Checkpoint>, CheckpointError> {
        let rooms = self.rooms.read().map_err(poison_err)?;
        Ok(rooms.get(room).and_then(|c| c.last().cloned()))
    }

    async fn prune(&self, room: &RoomId, keep_last: usize) -> Result<usize, CheckpointError> {
        let mut rooms = self.rooms.write().map_err(poison_err)?;
        let Some(checkpoints) = rooms.get_mut(room) else {
            return Ok(0);
        };
        // Never remove the most recent checkpoint
        let keep = keep_last.max(1);
        let removed = checkpoints.len().saturating_sub(keep);
        checkpoints.drain(..removed);
        drop(rooms);
        Ok(removed)
    }
}
