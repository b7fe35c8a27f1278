//! Message record types
//!
//! An [`IncomingMessage`] is immutable once appended to the log; it is the
//! sole source of truth for what happened in a room and is only ever
//! consumed and acknowledged, never mutated.

use crate::room::value_objects::{Author, RoomId};
use crate::util::timestamp_ms;
use serde::{Deserialize, Serialize};

/// Log-assigned record identifier, monotonic per room partition (Value Object)
///
/// Doubles as the idempotency key: a `DeliberationState` that has processed
/// record `n` has, by partition ordering, processed every record `<= n`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The next record id in the partition
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message consumed from a room's log partition (Entity, immutable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingMessage {
    record_id: RecordId,
    room_id: RoomId,
    author: Author,
    content: String,
    received_at_ms: u64,
}

impl IncomingMessage {
    /// Create a message stamped with the current receipt time
    pub fn new(
        record_id: RecordId,
        room_id: RoomId,
        author: Author,
        content: impl Into<String>,
    ) -> Self {
        Self {
            record_id,
            room_id,
            author,
            content: content.into(),
            received_at_ms: timestamp_ms(),
        }
    }

    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn received_at_ms(&self) -> u64 {
        self.received_at_ms
    }
}
