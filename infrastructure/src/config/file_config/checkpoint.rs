//! Checkpoint manager configuration from TOML (`[checkpoint]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [checkpoint]
//! max_snapshot_bytes = 10240
//! max_rationale_len = 512
//! retain_last = 8
//! commit_attempts = 4
//! ```

use boardroom_application::config::CheckpointParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Snapshot bounds and commit retry budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCheckpointConfig {
    /// Target upper bound on a serialized snapshot
    pub max_snapshot_bytes: usize,
    /// Rationale length after truncation
    pub max_rationale_len: usize,
    /// Checkpoints retained per room
    pub retain_last: usize,
    /// Commit attempt budget
    pub commit_attempts: u32,
    /// Base delay between commit retries
    pub commit_backoff_base_ms: u64,
}

impl Default for FileCheckpointConfig {
    fn default() -> Self {
        let params = CheckpointParams::default();
        Self {
            max_snapshot_bytes: params.max_snapshot_bytes,
            max_rationale_len: params.max_rationale_len,
            retain_last: params.retain_last,
            commit_attempts: params.commit_attempts,
            commit_backoff_base_ms: params.commit_backoff_base.as_millis() as u64,
        }
    }
}

impl FileCheckpointConfig {
    pub fn to_params(&self) -> CheckpointParams {
        CheckpointParams::default()
            .with_max_snapshot_bytes(self.max_snapshot_bytes)
            .with_max_rationale_len(self.max_rationale_len)
            .with_retain_last(self.retain_last)
            .with_commit_attempts(self.commit_attempts)
            .with_commit_backoff_base(Duration::from_millis(self.commit_backoff_base_ms))
    }
}
