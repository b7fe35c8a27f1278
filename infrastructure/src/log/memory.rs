//! In-memory partitioned message log
//!
//! Implements the [`MessageLog`] port with one append-only partition per
//! room and consumer-group delivery tracking (cursor plus pending-entries
//! list with delivery counts), matching the semantics of a durable
//! streaming log for single-process deployments and tests.
//!
//! ## Limitations
//!
//! - **Single-process only**: records are not visible across process
//!   boundaries
//! - **No persistence**: partition contents are lost when the process exits

use async_trait::async_trait;
use boardroom_application::ports::message_log::{
    DeadLetter, LogError, LogRecord, MessageLog, PendingRecord, RecordPayload,
};
use boardroom_domain::{RecordId, RoomId, util::timestamp_ms};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// One appended record
#[derive(Debug, Clone)]
struct StoredRecord {
    id: u64,
    payload: RecordPayload,
}

/// Delivery bookkeeping for an unacked record
#[derive(Debug, Clone)]
struct Delivery {
    delivered_at: Instant,
    delivery_count: u32,
}

/// Per-group read state
#[derive(Debug, Default)]
struct GroupState {
    /// Highest record id delivered to this group
    cursor: u64,
    /// Pending-entries list: delivered but unacked
    deliveries: HashMap<u64, Delivery>,
}

/// Per-room partition
#[derive(Debug, Default)]
struct Partition {
    records: Vec<StoredRecord>,
    next_id: u64,
    groups: HashMap<String, GroupState>,
    dead: Vec<DeadLetter>,
}

/// Converts a lock poison error to a log error.
fn poison_err<T>(_: PoisonError<T>) -> LogError {
    LogError::Unavailable("log lock poisoned".to_string())
}

/// In-memory message log with consumer groups
#[derive(Debug, Default)]
pub struct InMemoryMessageLog {
    rooms: RwLock<HashMap<RoomId, Partition>>,
}

impl InMemoryMessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records appended to a room's partition
    pub fn partition_len(&self, room: &RoomId) -> usize {
        self.rooms
            .read()
            .map(|rooms| rooms.get(room).map(|p| p.records.len()).unwrap_or(0))
            .unwrap_or(0)
    }
}

#[async_trait]
impl MessageLog for InMemoryMessageLog {
    async fn append(&self, room: &RoomId, payload: RecordPayload) -> Result<RecordId, LogError> {
        let mut rooms = self.rooms.write().map_err(poison_err)?;
        let partition = rooms.entry(room.clone()).or_default();
        partition.next_id += 1;
        let id = partition.next_id;
        partition.records.push(StoredRecord { id, payload });
        drop(rooms);
        Ok(RecordId::new(id))
    }

    async fn read_group(
        &self,
        room: &RoomId,
        group: &str,
        _consumer: &str,
        max_count: usize,
    ) -> Result<Vec<LogRecord>, LogError> {
        let mut rooms = self.rooms.write().map_err(poison_err)?;
        let partition = rooms.entry(room.clone()).or_default();

        // Group is created on first read
        let group_state = partition.groups.entry(group.to_string()).or_default();

        let mut delivered = Vec::new();
        for record in partition
            .records
            .iter()
            .filter(|r| r.id > group_state.cursor)
            .take(max_count)
        {
            group_state.deliveries.insert(
                record.id,
                Delivery {
                    delivered_at: Instant::now(),
                    delivery_count: 1,
                },
            );
            delivered.push(LogRecord {
                id: RecordId::new(record.id),
                payload: record.payload.clone(),
            });
        }
        if let Some(last) = delivered.last() {
            group_state.cursor = last.id.value();
        }
        drop(rooms);
        Ok(delivered)
    }

    async fn ack(&self, room: &RoomId, group: &str, record_id: RecordId) -> Result<(), LogError> {
        let mut rooms = self.rooms.write().map_err(poison_err)?;
        if let Some(partition) = rooms.get_mut(room)
            && let Some(group_state) = partition.groups.get_mut(group)
        {
            // Acking an already-acked record is a no-op, which keeps ack
            // retries idempotent.
            group_state.deliveries.remove(&record_id.value());
        }
        drop(rooms);
        Ok(())
    }

    async fn pending(
        &self,
        room: &RoomId,
        group: &str,
        min_idle: Duration,
    ) -> Result<Vec<PendingRecord>, LogError> {
        let mut rooms = self.rooms.write().map_err(poison_err)?;
        let Some(partition) = rooms.get_mut(room) else {
            return Ok(Vec::new());
        };
        let Some(group_state) = partition.groups.get_mut(group) else {
            return Ok(Vec::new());
        };

        let mut ids: Vec<u64> = group_state
            .deliveries
            .iter()
            .filter(|(_, d)| d.delivered_at.elapsed() >= min_idle)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();

        let mut reclaimed = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(record) = partition.records.iter().find(|r| r.id == id) else {
                continue;
            };
            let Some(delivery) = group_state.deliveries.get_mut(&id) else {
                continue;
            };
            delivery.delivered_at = Instant::now();
            delivery.delivery_count += 1;
            reclaimed.push(PendingRecord {
                record: LogRecord {
                    id: RecordId::new(id),
                    payload: record.payload.clone(),
                },
                delivery_count: delivery.delivery_count,
            });
        }
        drop(rooms);
        Ok(reclaimed)
    }

    async fn dead_letter(
        &self,
        room: &RoomId,
        record: &LogRecord,
        reason: &str,
    ) -> Result<(), LogError> {
        let mut rooms = self.rooms.write().map_err(poison_err)?;
        let partition = rooms.entry(room.clone()).or_default();
        partition.dead.push(DeadLetter {
            record: record.clone(),
            reason: reason.to_string(),
            at_ms: timestamp_ms(),
        });
        drop(rooms);
        Ok(())
    }

    async fn dead_letters(&self, room: &RoomId) -> Result<Vec<DeadLetter>, LogError> {
        let rooms = self.rooms.read().map_err(poison_err)?;
        Ok(rooms.get(room).map(|p| p.dead.clone()).unwrap_or_default())
    }
}
