//! Intake consumer configuration from TOML (`[intake]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [intake]
//! group = "boardroom"
//! batch_size = 16
//! max_attempts = 5
//! pending_min_idle_ms = 30000
//! ```

use boardroom_application::config::IntakeParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Intake loop control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileIntakeConfig {
    /// Consumer group name
    pub group: String,
    /// Records fetched per poll cycle
    pub batch_size: usize,
    /// Deliveries before a record is dead-lettered
    pub max_attempts: u32,
    /// Unacked idle time before a record is re-claimed
    pub pending_min_idle_ms: u64,
    /// Base delay between ack retries
    pub ack_backoff_base_ms: u64,
    /// Attempt budget for ack retries
    pub ack_attempts: u32,
}

impl Default for FileIntakeConfig {
    fn default() -> Self {
        let params = IntakeParams::default();
        Self {
            group: params.group,
            batch_size: params.batch_size,
            max_attempts: params.max_attempts,
            pending_min_idle_ms: params.pending_min_idle.as_millis() as u64,
            ack_backoff_base_ms: params.ack_backoff_base.as_millis() as u64,
            ack_attempts: params.ack_attempts,
        }
    }
}

impl FileIntakeConfig {
    pub fn to_params(&self) -> IntakeParams {
        IntakeParams::default()
            .with_group(self.group.clone())
            .with_batch_size(self.batch_size)
            .with_max_attempts(self.max_attempts)
            .with_pending_min_idle(Duration::from_millis(self.pending_min_idle_ms))
            .with_ack_backoff(
                Duration::from_millis(self.ack_backoff_base_ms),
                self.ack_attempts,
            )
    }
}
