//! Checkpoint manager
//!
//! Wraps the checkpoint store with the policies the orchestrator relies
//! on: snapshot size bounding (rationale truncation, never a commit
//! failure), commit retry with exponential backoff, and asynchronous
//! retention pruning.

use crate::config::params::CheckpointParams;
use crate::ports::checkpoint_store::{CheckpointError, CheckpointStore};
use crate::ports::metrics::{MetricsSink, metric};
use crate::retry::Backoff;
use boardroom_domain::{DeliberationState, RoomId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Policy wrapper around a [`CheckpointStore`]
pub struct CheckpointManager {
    store: Arc<dyn CheckpointStore>,
    metrics: Arc<dyn MetricsSink>,
    params: CheckpointParams,
}

impl CheckpointManager {
    pub fn new(
        store: Arc<dyn CheckpointStore>,
        metrics: Arc<dyn MetricsSink>,
        params: CheckpointParams,
    ) -> Self {
        Self {
            store,
            metrics,
            params,
        }
    }

    pub fn store(&self) -> &Arc<dyn CheckpointStore> {
        &self.store
    }

    /// Commit a snapshot, returning its assigned sequence number
    ///
    /// Oversized snapshots are cut down by truncating rationales; transient
    /// store errors are retried up to the configured attempt budget before
    /// the error propagates (the caller then aborts the run and marks the
    /// room degraded).
    pub async fn commit(&self, state: &DeliberationState) -> Result<u64, CheckpointError> {
        let (bounded, snapshot_bytes) = self.bound(state)?;
        self.metrics
            .observe(metric::SNAPSHOT_BYTES, snapshot_bytes as f64);

        let backoff = Backoff::new(self.params.commit_backoff_base, self.params.commit_attempts);
        let mut delays = backoff.delays();
        loop {
            match self.store.commit(&bounded).await {
                Ok(sequence) => {
                    debug!(
                        room = %bounded.room_id(),
                        sequence,
                        bytes = snapshot_bytes,
                        "checkpoint committed"
                    );
                    self.spawn_prune(bounded.room_id().clone());
                    return Ok(sequence);
                }
                Err(e) if e.is_transient() => match delays.next() {
                    Some(delay) => {
                        self.metrics.incr(metric::COMMIT_RETRIES, 1);
                        warn!(room = %bounded.room_id(), error = %e, "checkpoint commit failed, retrying");
                        tokio::time::sleep(delay).await;
                    }
                    None => return Err(e),
                },
                Err(e) => return Err(e),
            }
        }
    }

    /// Load the latest committed state for a room
    ///
    /// A corrupt snapshot propagates as [`CheckpointError::Corrupt`] for
    /// manual intervention; it is never discarded here.
    pub async fn restore(&self, room: &RoomId) -> Result<Option<DeliberationState>, CheckpointError> {
        Ok(self
            .store
            .restore(room)
            .await?
            .map(|checkpoint| checkpoint.into_state()))
    }

    /// Enforce the snapshot byte bound, truncating rationales if needed
    fn bound(
        &self,
        state: &DeliberationState,
    ) -> Result<(DeliberationState, usize), CheckpointError> {
        let serialized = serde_json::to_vec(state)?;
        if serialized.len() <= self.params.max_snapshot_bytes {
            return Ok((state.clone(), serialized.len()));
        }

        let truncated = state.clone().truncate_rationales(self.params.max_rationale_len);
        let truncated_len = serde_json::to_vec(&truncated)?.len();
        self.metrics.incr(metric::RATIONALE_TRUNCATIONS, 1);
        warn!(
            room = %state.room_id(),
            before = serialized.len(),
            after = truncated_len,
            "snapshot over size bound, rationales truncated"
        );
        Ok((truncated, truncated_len))
    }

    fn spawn_prune(&self, room: RoomId) {
        let store = Arc::clone(&self.store);
        let keep_last = self.params.retain_last;
        tokio::spawn(async move {
            if let Err(e) = store.prune(&room, keep_last).await {
                warn!(room = %room, error = %e, "checkpoint prune failed");
            }
        });
    }
}
