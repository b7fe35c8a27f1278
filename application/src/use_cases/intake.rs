//! Intake consumer
//!
//! Per-room consumer-group member. Each poll cycle re-claims the group's
//! pending-entries list before reading fresh records, so crash recovery
//! makes progress before new work is admitted. Records are acknowledged
//! strictly after the deliberation's final checkpoint commits; duplicate
//! deliveries are detected against the last processed record id inside the
//! restored state and acked as no-ops.

use crate::config::params::{IntakeParams, RoomParams};
use crate::ports::checkpoint_store::CheckpointError;
use crate::ports::message_log::{LogError, LogRecord, MessageLog};
use crate::ports::metrics::{MetricsSink, metric};
use crate::ports::room_lock::{AcquireOutcome, LockError, RoomLockCoordinator};
use crate::retry::Backoff;
use crate::use_cases::checkpoint_manager::CheckpointManager;
use crate::use_cases::run_deliberation::{DeliberationError, RunDeliberationUseCase};
use boardroom_domain::{DeliberationState, DomainError, RecordId, Room, RoomId};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during an intake cycle
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Log error: {0}")]
    Log(#[from] LogError),

    #[error("Lock error: {0}")]
    Lock(#[from] LockError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] CheckpointError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A record failed deliberation but has deliveries left before
    /// dead-lettering; it stays unacked for redelivery
    #[error("Deliberation failed, record {record} left for redelivery: {source}")]
    RunFailed {
        record: RecordId,
        source: DeliberationError,
    },
}

/// What one poll cycle did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Records deliberated to a terminal outcome and acked
    pub processed: usize,
    /// Duplicate deliveries acked without reprocessing
    pub duplicates: usize,
    /// Records routed to the dead-letter partition
    pub dead_lettered: usize,
    /// Cycle stopped early because the room was busy
    pub deferred: bool,
}

impl PollSummary {
    /// Whether the cycle made any forward progress
    pub fn made_progress(&self) -> bool {
        self.processed > 0 || self.duplicates > 0 || self.dead_lettered > 0
    }

    fn absorb(&mut self, other: PollSummary) {
        self.processed += other.processed;
        self.duplicates += other.duplicates;
        self.dead_lettered += other.dead_lettered;
        self.deferred |= other.deferred;
    }
}

enum Disposition {
    /// The record was acked (processed, duplicate, or dead-lettered)
    Handled,
    /// The room is held by another run; stop this cycle, retry later
    Deferred,
}

/// Drains a room's partition under the deployment's consumer group
pub struct IntakeConsumer {
    log: Arc<dyn MessageLog>,
    locks: Arc<dyn RoomLockCoordinator>,
    checkpoints: Arc<CheckpointManager>,
    orchestrator: Arc<RunDeliberationUseCase>,
    metrics: Arc<dyn MetricsSink>,
    intake: IntakeParams,
    rooms: RoomParams,
    consumer_name: String,
}

impl IntakeConsumer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        log: Arc<dyn MessageLog>,
        locks: Arc<dyn RoomLockCoordinator>,
        checkpoints: Arc<CheckpointManager>,
        orchestrator: Arc<RunDeliberationUseCase>,
        metrics: Arc<dyn MetricsSink>,
        intake: IntakeParams,
        rooms: RoomParams,
        consumer_name: impl Into<String>,
    ) -> Self {
        Self {
            log,
            locks,
            checkpoints,
            orchestrator,
            metrics,
            intake,
            rooms,
            consumer_name: consumer_name.into(),
        }
    }

    pub fn consumer_name(&self) -> &str {
        &self.consumer_name
    }

    /// Run one poll cycle for a room: pending re-claims first, then fresh
    /// records, in log order
    pub async fn poll_room(
        &self,
        room: &RoomId,
        cancel: &CancellationToken,
    ) -> Result<PollSummary, IntakeError> {
        let mut summary = PollSummary::default();

        let pending = self
            .log
            .pending(room, &self.intake.group, self.intake.pending_min_idle)
            .await?;
        for entry in pending {
            match self
                .handle_record(room, &entry.record, entry.delivery_count, cancel, &mut summary)
                .await?
            {
                Disposition::Handled => {}
                Disposition::Deferred => {
                    summary.deferred = true;
                    return Ok(summary);
                }
            }
        }

        let fresh = self
            .log
            .read_group(
                room,
                &self.intake.group,
                &self.consumer_name,
                self.intake.batch_size,
            )
            .await?;
        for record in fresh {
            match self
                .handle_record(room, &record, 1, cancel, &mut summary)
                .await?
            {
                Disposition::Handled => {}
                Disposition::Deferred => {
                    summary.deferred = true;
                    break;
                }
            }
        }

        Ok(summary)
    }

    /// Poll until a cycle makes no progress; returns the aggregate
    pub async fn drain_room(
        &self,
        room: &RoomId,
        cancel: &CancellationToken,
    ) -> Result<PollSummary, IntakeError> {
        let mut total = PollSummary::default();
        loop {
            let cycle = self.poll_room(room, cancel).await?;
            let progressed = cycle.made_progress();
            total.absorb(cycle);
            if !progressed || cancel.is_cancelled() {
                return Ok(total);
            }
        }
    }

    async fn handle_record(
        &self,
        room: &RoomId,
        record: &LogRecord,
        delivery_count: u32,
        cancel: &CancellationToken,
        summary: &mut PollSummary,
    ) -> Result<Disposition, IntakeError> {
        let state = self.restore_or_new(room).await?;

        // A mid-run checkpoint for this record means a previous worker
        // crashed (or lost its lease) between the first transition commit
        // and the ack; the run resumes rather than counting as a duplicate.
        let resumable = state
            .proposal()
            .is_some_and(|p| !p.is_terminal() && p.record_id() == record.id);

        // Duplicate delivery: the committed state already reflects this
        // record, so acking is the only remaining effect.
        if state.has_processed(record.id) && !resumable {
            debug!(room = %room, record = %record.id, "duplicate delivery, acking");
            self.metrics.incr(metric::DUPLICATE_DELIVERIES, 1);
            self.ack_with_retry(room, record.id).await?;
            summary.duplicates += 1;
            return Ok(Disposition::Handled);
        }

        // A payload that cannot carry a valid message never will; route it
        // straight to triage.
        let Some(message) = record.to_message(room) else {
            warn!(room = %room, record = %record.id, "malformed payload, dead-lettering");
            return self
                .dead_letter(room, record, "malformed payload: empty author", summary)
                .await;
        };

        let lease = match self.locks.acquire(room, &self.consumer_name).await? {
            AcquireOutcome::Acquired(lease) => lease,
            AcquireOutcome::Busy { holder } => {
                debug!(room = %room, ?holder, "room busy, deferring record");
                return Ok(Disposition::Deferred);
            }
        };

        // Keep the lease alive while the run is in flight; a run that
        // outlives its TTL without renewal would let another worker in.
        let renewer = self.spawn_renewer(&lease);
        let result = self.orchestrator.execute(state, &message, cancel).await;
        renewer.abort();

        match result {
            Ok(_) => {
                // Ack strictly after the terminal checkpoint committed; the
                // lease is released either way
                let acked = self.ack_with_retry(room, record.id).await;
                self.release(lease).await;
                acked?;
                summary.processed += 1;
                Ok(Disposition::Handled)
            }
            Err(e) => {
                self.release(lease).await;
                if matches!(e, DeliberationError::Persistence(_)) {
                    self.mark_degraded(room).await;
                }
                if delivery_count >= self.intake.max_attempts {
                    info!(
                        room = %room,
                        record = %record.id,
                        attempts = delivery_count,
                        "retry budget exhausted, dead-lettering"
                    );
                    let disposition = self
                        .dead_letter(room, record, &e.to_string(), summary)
                        .await?;
                    self.mark_degraded(room).await;
                    Ok(disposition)
                } else {
                    Err(IntakeError::RunFailed {
                        record: record.id,
                        source: e,
                    })
                }
            }
        }
    }

    async fn restore_or_new(&self, room: &RoomId) -> Result<DeliberationState, IntakeError> {
        match self.checkpoints.restore(room).await? {
            Some(state) => Ok(state),
            None => {
                let room = Room::new(room.clone(), self.rooms.roster.clone())?;
                Ok(DeliberationState::new(room))
            }
        }
    }

    async fn dead_letter(
        &self,
        room: &RoomId,
        record: &LogRecord,
        reason: &str,
        summary: &mut PollSummary,
    ) -> Result<Disposition, IntakeError> {
        self.log.dead_letter(room, record, reason).await?;
        self.ack_with_retry(room, record.id).await?;
        self.metrics.incr(metric::DEAD_LETTERS, 1);
        summary.dead_lettered += 1;
        Ok(Disposition::Handled)
    }

    /// Best-effort: persist a degraded room status for state queries
    async fn mark_degraded(&self, room: &RoomId) {
        match self.restore_or_new(room).await {
            Ok(state) => {
                let degraded = state.mark_degraded();
                if let Err(e) = self.checkpoints.commit(&degraded).await {
                    warn!(room = %room, error = %e, "could not persist degraded status");
                }
            }
            Err(e) => warn!(room = %room, error = %e, "could not load state to mark degraded"),
        }
    }

    fn spawn_renewer(&self, lease: &crate::ports::room_lock::RoomLease) -> tokio::task::JoinHandle<()> {
        let locks = Arc::clone(&self.locks);
        let lease = lease.clone();
        let interval = (lease.ttl() / 3).max(std::time::Duration::from_millis(10));
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                match locks.renew(&lease).await {
                    Ok(outcome) if outcome.is_renewed() => {}
                    Ok(_) => {
                        warn!(room = %lease.room(), "lease lost during run");
                        return;
                    }
                    Err(e) => {
                        warn!(room = %lease.room(), error = %e, "lease renewal failed");
                        return;
                    }
                }
            }
        })
    }

    async fn release(&self, lease: crate::ports::room_lock::RoomLease) {
        let room = lease.room().clone();
        if let Err(e) = self.locks.release(lease).await {
            warn!(room = %room, error = %e, "lease release failed");
        }
    }

    async fn ack_with_retry(&self, room: &RoomId, record_id: RecordId) -> Result<(), IntakeError> {
        let backoff = Backoff::new(self.intake.ack_backoff_base, self.intake.ack_attempts);
        let mut delays = backoff.delays();
        loop {
            match self.log.ack(room, &self.intake.group, record_id).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() => match delays.next() {
                    Some(delay) => {
                        warn!(room = %room, record = %record_id, error = %e, "ack failed, retrying");
                        tokio::time::sleep(delay).await;
                    }
                    None => return Err(e.into()),
                },
                Err(e) => return Err(e.into()),
            }
        }
    }
}
