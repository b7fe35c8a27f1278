//! Durable snapshots of a room's deliberation state
//!
//! A checkpoint is immutable once written. Sequence numbers are assigned by
//! the store, strictly increasing and gapless per room relative to
//! committed turns; older checkpoints are superseded, not deleted, until
//! retention reclaims them.

use crate::deliberation::state::DeliberationState;
use crate::room::value_objects::RoomId;
use crate::util::timestamp_ms;
use serde::{Deserialize, Serialize};

/// A restorable snapshot of a room at a committed transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    sequence: u64,
    created_at_ms: u64,
    state: DeliberationState,
}

impl Checkpoint {
    /// Wrap a state with its store-assigned sequence number
    pub fn new(state: DeliberationState, sequence: u64) -> Self {
        Self {
            sequence,
            created_at_ms: timestamp_ms(),
            state,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        self.state.room_id()
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    pub fn state(&self) -> &DeliberationState {
        &self.state
    }

    /// Consume and return the snapshotted state
    pub fn into_state(self) -> DeliberationState {
        self.state
    }
}
