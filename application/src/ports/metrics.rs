//! Metrics sink port
//!
//! The orchestrator and checkpoint manager emit counters and histogram
//! samples to a sink supplied by the host; this layer only names them.

/// Well-known metric names
pub mod metric {
    pub const TURN_DURATION_MS: &str = "deliberation.turn_duration_ms";
    pub const SNAPSHOT_BYTES: &str = "checkpoint.snapshot_bytes";
    pub const RATIONALE_TRUNCATIONS: &str = "checkpoint.rationale_truncations";
    pub const COMMIT_RETRIES: &str = "checkpoint.commit_retries";
    pub const ESCALATIONS: &str = "deliberation.escalations";
    pub const DEAD_LETTERS: &str = "intake.dead_letters";
    pub const DUPLICATE_DELIVERIES: &str = "intake.duplicate_deliveries";
}

/// Consumer-supplied metrics destination
pub trait MetricsSink: Send + Sync {
    /// Increment a counter
    fn incr(&self, name: &str, value: u64);

    /// Record one histogram observation
    fn observe(&self, name: &str, value: f64);
}

/// No-op sink for tests and metric-less deployments
pub struct NoMetrics;

impl MetricsSink for NoMetrics {
    fn incr(&self, _name: &str, _value: u64) {}
    fn observe(&self, _name: &str, _value: f64) {}
}
