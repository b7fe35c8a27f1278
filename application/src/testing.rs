//! In-crate test doubles for ports
//!
//! Compiled only for unit tests; the production adapters live in the
//! infrastructure crate.

use crate::ports::agent_pool::{AgentError, DeliberationContext, Deliberator};
use crate::ports::checkpoint_store::{CheckpointError, CheckpointStore};
use crate::ports::metrics::MetricsSink;
use async_trait::async_trait;
use boardroom_domain::{AgentRole, Checkpoint, DeliberationState, Position, RoomId, Stance};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Minimal in-memory checkpoint store
#[derive(Default)]
pub(crate) struct MemoryStore {
    rooms: Mutex<HashMap<RoomId, Vec<Checkpoint>>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointStore for MemoryStore {
    async fn commit(&self, state: &DeliberationState) -> Result<u64, CheckpointError> {
        let mut rooms = self.rooms.lock().unwrap();
        let checkpoints = rooms.entry(state.room_id().clone()).or_default();
        let sequence = checkpoints.last().map(|c| c.sequence()).unwrap_or(0) + 1;
        checkpoints.push(Checkpoint::new(state.clone(), sequence));
        Ok(sequence)
    }

    async fn restore(&self, room: &RoomId) -> Result<Option<Checkpoint>, CheckpointError> {
        let rooms = self.rooms.lock().unwrap();
        Ok(rooms.get(room).and_then(|c| c.last().cloned()))
    }

    async fn prune(&self, room: &RoomId, keep_last: usize) -> Result<usize, CheckpointError> {
        let mut rooms = self.rooms.lock().unwrap();
        let Some(checkpoints) = rooms.get_mut(room) else {
            return Ok(0);
        };
        let keep = keep_last.max(1);
        let removed = checkpoints.len().saturating_sub(keep);
        checkpoints.drain(..removed);
        Ok(removed)
    }
}

/// Store that fails the first `n` commits with a transient error
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    failures_left: AtomicU32,
}

impl FlakyStore {
    pub(crate) fn failing(n: u32) -> Self {
        Self {
            inner: MemoryStore::new(),
            failures_left: AtomicU32::new(n),
        }
    }
}

#[async_trait]
impl CheckpointStore for FlakyStore {
    async fn commit(&self, state: &DeliberationState) -> Result<u64, CheckpointError> {
        if self.failures_left.load(Ordering::SeqCst) > 0 {
            self.failures_left.fetch_sub(1, Ordering::SeqCst);
            return Err(CheckpointError::Unavailable("injected outage".to_string()));
        }
        self.inner.commit(state).await
    }

    async fn restore(&self, room: &RoomId) -> Result<Option<Checkpoint>, CheckpointError> {
        self.inner.restore(room).await
    }

    async fn prune(&self, room: &RoomId, keep_last: usize) -> Result<usize, CheckpointError> {
        self.inner.prune(room, keep_last).await
    }
}

/// Metrics sink that remembers everything it saw
#[derive(Default)]
pub(crate) struct CountingMetrics {
    counters: Mutex<HashMap<String, u64>>,
    observations: Mutex<HashMap<String, Vec<f64>>>,
}

impl CountingMetrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn count(&self, name: &str) -> u64 {
        *self.counters.lock().unwrap().get(name).unwrap_or(&0)
    }

    pub(crate) fn observations(&self, name: &str) -> Vec<f64> {
        self.observations
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }
}

impl MetricsSink for CountingMetrics {
    fn incr(&self, name: &str, value: u64) {
        *self.counters.lock().unwrap().entry(name.to_string()).or_default() += value;
    }

    fn observe(&self, name: &str, value: f64) {
        self.observations
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push(value);
    }
}

/// Deliberator that always takes the same stance
pub(crate) struct StancedAgent {
    pub role: AgentRole,
    pub stance: Stance,
    pub confidence: f64,
}

#[async_trait]
impl Deliberator for StancedAgent {
    fn role(&self) -> AgentRole {
        self.role.clone()
    }

    async fn deliberate(&self, ctx: &DeliberationContext) -> Result<Position, AgentError> {
        Ok(
            Position::new(self.role.clone(), self.stance, "scripted stance", ctx.turn)
                .with_confidence(self.confidence),
        )
    }
}

/// Deliberator that sleeps past any reasonable deadline
pub(crate) struct SlowAgent {
    pub role: AgentRole,
    pub delay: Duration,
}

#[async_trait]
impl Deliberator for SlowAgent {
    fn role(&self) -> AgentRole {
        self.role.clone()
    }

    async fn deliberate(&self, ctx: &DeliberationContext) -> Result<Position, AgentError> {
        tokio::time::sleep(self.delay).await;
        Ok(Position::support(self.role.clone(), "finally responded", ctx.turn).with_confidence(0.9))
    }
}

/// Deliberator whose backend always errors
pub(crate) struct FailingAgent {
    pub role: AgentRole,
}

#[async_trait]
impl Deliberator for FailingAgent {
    fn role(&self) -> AgentRole {
        self.role.clone()
    }

    async fn deliberate(&self, _ctx: &DeliberationContext) -> Result<Position, AgentError> {
        Err(AgentError::Invocation("backend exploded".to_string()))
    }
}
