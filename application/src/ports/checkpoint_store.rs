//! Checkpoint store port
//!
//! Transactional persistence for deliberation snapshots. The store is safe
//! for concurrent writes across different rooms but single-writer per room
//! (enforced by the room lease, not by the store).

use async_trait::async_trait;
use boardroom_domain::{Checkpoint, DeliberationState, RoomId};
use thiserror::Error;

/// Errors that can occur at the checkpoint boundary
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// The store is temporarily unreachable; callers retry with backoff
    #[error("Checkpoint store unavailable: {0}")]
    Unavailable(String),

    /// A restore produced an unparsable snapshot. Never auto-discarded;
    /// surfaced for manual intervention.
    #[error("Corrupt checkpoint for room {room}: {detail}")]
    Corrupt { room: String, detail: String },

    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CheckpointError {
    /// Check whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, CheckpointError::Unavailable(_))
    }
}

/// Durable, per-room snapshot storage
///
/// The store assigns sequence numbers: strictly increasing and gapless per
/// room. `restore` returns the latest committed checkpoint.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Persist a snapshot of the state, returning its assigned sequence
    async fn commit(&self, state: &DeliberationState) -> Result<u64, CheckpointError>;

    /// Load the latest checkpoint for a room, if any
    async fn restore(&self, room: &RoomId) -> Result<Option<Checkpoint>, CheckpointError>;

    /// Reclaim old checkpoints, keeping the most recent `keep_last`
    ///
    /// Must never remove the most recent checkpoint. Returns the number of
    /// checkpoints removed.
    async fn prune(&self, room: &RoomId, keep_last: usize) -> Result<usize, CheckpointError>;
}
