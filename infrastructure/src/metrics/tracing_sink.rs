//! Tracing-backed metrics sink
//!
//! Emits counters and histogram samples as structured `tracing` events
//! under the `boardroom::metrics` target, so any subscriber (or a metrics
//! bridge layered on one) can pick them up.

use boardroom_application::ports::metrics::MetricsSink;
use tracing::debug;

/// Metrics sink that forwards to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMetricsSink;

impl TracingMetricsSink {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsSink for TracingMetricsSink {
    fn incr(&self, name: &str, value: u64) {
        debug!(target: "boardroom::metrics", counter = name, value, "incr");
    }

    fn observe(&self, name: &str, value: f64) {
        debug!(target: "boardroom::metrics", histogram = name, value, "observe");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardroom_application::ports::metrics::metric;

    #[test]
    fn test_sink_does_not_panic_without_subscriber() {
        let sink = TracingMetricsSink::new();
        sink.incr(metric::ESCALATIONS, 1);
        sink.observe(metric::TURN_DURATION_MS, 12.5);
    }
}
