//! Parameter groups for per-component loop control
//!
//! These are application-layer concerns (budgets, timeouts, batch sizes),
//! not domain policy; the domain-side thresholds live in
//! [`ResolutionRule`](boardroom_domain::ResolutionRule).

use boardroom_domain::AgentRole;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Intake consumer loop control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeParams {
    /// Consumer group name; one group per deployment
    pub group: String,
    /// Maximum records fetched per poll cycle
    pub batch_size: usize,
    /// Deliveries before a record is dead-lettered
    pub max_attempts: u32,
    /// How long a delivered record may sit unacked before re-claim
    pub pending_min_idle: Duration,
    /// Base delay for ack retry backoff
    pub ack_backoff_base: Duration,
    /// Attempt budget for ack retries
    pub ack_attempts: u32,
}

impl Default for IntakeParams {
    fn default() -> Self {
        Self {
            group: "boardroom".to_string(),
            batch_size: 16,
            max_attempts: 5,
            pending_min_idle: Duration::from_secs(30),
            ack_backoff_base: Duration::from_millis(100),
            ack_attempts: 4,
        }
    }
}

impl IntakeParams {
    // ==================== Builder Methods ====================

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_pending_min_idle(mut self, min_idle: Duration) -> Self {
        self.pending_min_idle = min_idle;
        self
    }

    pub fn with_ack_backoff(mut self, base: Duration, attempts: u32) -> Self {
        self.ack_backoff_base = base;
        self.ack_attempts = attempts;
        self
    }
}

/// Checkpoint manager bounds and retry budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointParams {
    /// Target upper bound on a serialized snapshot
    pub max_snapshot_bytes: usize,
    /// Rationale length after truncation kicks in
    pub max_rationale_len: usize,
    /// Checkpoints retained per room
    pub retain_last: usize,
    /// Attempt budget for commit retries
    pub commit_attempts: u32,
    /// Base delay for commit retry backoff
    pub commit_backoff_base: Duration,
}

impl Default for CheckpointParams {
    fn default() -> Self {
        Self {
            max_snapshot_bytes: 10 * 1024,
            max_rationale_len: 512,
            retain_last: 8,
            commit_attempts: 4,
            commit_backoff_base: Duration::from_millis(100),
        }
    }
}

impl CheckpointParams {
    // ==================== Builder Methods ====================

    pub fn with_max_snapshot_bytes(mut self, bytes: usize) -> Self {
        self.max_snapshot_bytes = bytes;
        self
    }

    pub fn with_max_rationale_len(mut self, len: usize) -> Self {
        self.max_rationale_len = len;
        self
    }

    pub fn with_retain_last(mut self, retain_last: usize) -> Self {
        self.retain_last = retain_last;
        self
    }

    pub fn with_commit_attempts(mut self, attempts: u32) -> Self {
        self.commit_attempts = attempts;
        self
    }

    pub fn with_commit_backoff_base(mut self, base: Duration) -> Self {
        self.commit_backoff_base = base;
        self
    }
}

/// Lease coordination parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockParams {
    /// Lease time-to-live; expiry makes the room reclaimable
    pub lease_ttl: Duration,
}

impl Default for LockParams {
    fn default() -> Self {
        Self {
            lease_ttl: Duration::from_secs(30),
        }
    }
}

impl LockParams {
    pub fn with_lease_ttl(mut self, ttl: Duration) -> Self {
        self.lease_ttl = ttl;
        self
    }
}

/// Per-room deliberation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomParams {
    /// Roles enabled for newly created rooms
    pub roster: Vec<AgentRole>,
    /// Deadline for each agent invocation within a turn
    pub agent_timeout: Duration,
}

impl Default for RoomParams {
    fn default() -> Self {
        Self {
            roster: AgentRole::default_roster(),
            agent_timeout: Duration::from_secs(15),
        }
    }
}

impl RoomParams {
    pub fn with_roster(mut self, roster: Vec<AgentRole>) -> Self {
        self.roster = roster;
        self
    }

    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }
}
