//! Run deliberation use case
//!
//! The orchestrator state machine:
//! `Idle -> ProposalOpen -> CollectingPositions -> Resolving ->
//! {Accepted, Rejected, Escalated} -> Idle`.
//!
//! Every transition commits a checkpoint before it counts; the triggering
//! message is acknowledged by the intake consumer only after the final
//! commit succeeds, never here.

use crate::config::params::RoomParams;
use crate::ports::agent_pool::{AgentPool, DeliberationContext, Deliberator};
use crate::ports::checkpoint_store::CheckpointError;
use crate::ports::metrics::{MetricsSink, metric};
use crate::use_cases::checkpoint_manager::CheckpointManager;
use boardroom_domain::{
    AgentRole, DeliberationPhase, DeliberationState, DomainError, IncomingMessage, Position,
    PositionTally, Proposal, ProposalStatus, ResolutionOutcome, ResolutionRule,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use ulid::Ulid;

/// Errors that can occur during a deliberation run
#[derive(Error, Debug)]
pub enum DeliberationError {
    /// Checkpoint retry budget exhausted; the room must be marked degraded
    /// and the triggering record left unacked
    #[error("Persistence failed: {0}")]
    Persistence(#[from] CheckpointError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Cooperative cancellation observed at a turn boundary
    #[error("Run cancelled at turn boundary")]
    Cancelled,
}

/// Use case for running one room's deliberation to a terminal outcome
pub struct RunDeliberationUseCase {
    pool: AgentPool,
    checkpoints: Arc<CheckpointManager>,
    metrics: Arc<dyn MetricsSink>,
    rule: ResolutionRule,
    rooms: RoomParams,
}

impl RunDeliberationUseCase {
    pub fn new(
        pool: AgentPool,
        checkpoints: Arc<CheckpointManager>,
        metrics: Arc<dyn MetricsSink>,
        rule: ResolutionRule,
        rooms: RoomParams,
    ) -> Self {
        Self {
            pool,
            checkpoints,
            metrics,
            rule,
            rooms,
        }
    }

    /// Whether a committed state is an interrupted run of this message
    /// (crashed worker, expired lease) that should resume rather than
    /// restart
    pub fn can_resume(state: &DeliberationState, message: &IncomingMessage) -> bool {
        state
            .proposal()
            .is_some_and(|p| !p.is_terminal() && p.record_id() == message.record_id())
    }

    /// Deliberate the message to a terminal proposal status
    ///
    /// Consumes the room's current state and returns the committed final
    /// state. A state checkpointed mid-run for this same record resumes at
    /// its committed turn instead of restarting. Cancellation is honored at
    /// turn boundaries only; an in-flight agent call that times out becomes
    /// an abstain, not a cancellation.
    pub async fn execute(
        &self,
        state: DeliberationState,
        message: &IncomingMessage,
        cancel: &CancellationToken,
    ) -> Result<DeliberationState, DeliberationError> {
        let mut state = if Self::can_resume(&state, message) {
            info!(
                room = %message.room_id(),
                record = %message.record_id(),
                turn = state.turn(),
                phase = %state.phase(),
                "resuming deliberation from checkpoint"
            );
            state
        } else {
            info!(
                room = %message.room_id(),
                record = %message.record_id(),
                "starting deliberation"
            );
            let proposal = Proposal::new(
                Ulid::new().to_string(),
                message.record_id(),
                message.content(),
            );
            let opened = state.open_proposal(proposal, message.record_id())?;
            self.checkpoints.commit(&opened).await?;
            opened
        };

        loop {
            if cancel.is_cancelled() {
                return Err(DeliberationError::Cancelled);
            }

            let turn = state.turn();
            let turn_started = Instant::now();

            // A resumed turn may already hold some or all of its positions;
            // only the missing roles are dispatched.
            let missing = self.missing_roles(&state, turn);
            if !missing.is_empty() {
                state = state.begin_collecting();
                self.checkpoints.commit(&state).await?;

                let positions = self.collect_positions(&state, &missing).await;
                state = state.record_positions(positions)?.begin_resolving();
                self.checkpoints.commit(&state).await?;
            } else if state.phase() != DeliberationPhase::Resolving {
                state = state.begin_resolving();
                self.checkpoints.commit(&state).await?;
            }

            let proposal = state.proposal().ok_or(DomainError::NoOpenProposal)?;
            let tally = PositionTally::from_positions(&proposal.positions_for_turn(turn));
            let outcome = self.rule.decide(&tally, turn);
            self.metrics.observe(
                metric::TURN_DURATION_MS,
                turn_started.elapsed().as_millis() as f64,
            );
            debug!(
                room = %state.room_id(),
                turn,
                support = tally.support_score,
                oppose = tally.oppose_score,
                %outcome,
                "turn resolved"
            );

            match outcome {
                ResolutionOutcome::Accepted => {
                    return self.conclude(state, ProposalStatus::Accepted).await;
                }
                ResolutionOutcome::Rejected => {
                    return self.conclude(state, ProposalStatus::Rejected).await;
                }
                ResolutionOutcome::Escalated => {
                    self.metrics.incr(metric::ESCALATIONS, 1);
                    return self.conclude(state, ProposalStatus::Escalated).await;
                }
                ResolutionOutcome::Continue => {
                    state = state.next_turn()?;
                    self.checkpoints.commit(&state).await?;
                    debug!(room = %state.room_id(), turn = state.turn(), "rebuttal round");
                }
            }
        }
    }

    async fn conclude(
        &self,
        state: DeliberationState,
        status: ProposalStatus,
    ) -> Result<DeliberationState, DeliberationError> {
        let state = state.conclude(status)?;
        self.checkpoints.commit(&state).await?;
        info!(room = %state.room_id(), %status, "deliberation concluded");
        Ok(state)
    }

    /// Roster roles without a recorded position for the turn
    fn missing_roles(&self, state: &DeliberationState, turn: u32) -> Vec<AgentRole> {
        let responded: Vec<&AgentRole> = state
            .proposal()
            .map(|p| {
                p.positions_for_turn(turn)
                    .into_iter()
                    .map(|position| position.role())
                    .collect()
            })
            .unwrap_or_default();
        state
            .room()
            .roster()
            .iter()
            .filter(|role| !responded.contains(role))
            .cloned()
            .collect()
    }

    /// Fan out to the given roles concurrently; fan in when each has a
    /// position. A timed-out or failed agent contributes the default
    /// abstain without aborting sibling calls.
    async fn collect_positions(
        &self,
        state: &DeliberationState,
        roles: &[AgentRole],
    ) -> Vec<Position> {
        let turn = state.turn();
        let proposal_text = state
            .proposal()
            .map(|p| p.text().to_string())
            .unwrap_or_default();
        let prior_positions = state
            .proposal()
            .map(|p| p.positions().to_vec())
            .unwrap_or_default();
        let ctx = Arc::new(
            DeliberationContext::new(state.room_id().clone(), proposal_text, turn)
                .with_prior_positions(prior_positions),
        );

        let mut positions = Vec::with_capacity(roles.len());
        let mut join_set = JoinSet::new();

        for role in roles {
            let Some(agent) = self.pool.get(role) else {
                warn!(room = %state.room_id(), %role, "no deliberator registered for role");
                positions.push(Position::abstain(
                    role.clone(),
                    "no deliberator registered",
                    turn,
                ));
                continue;
            };

            let agent: Arc<dyn Deliberator> = Arc::clone(agent);
            let ctx = Arc::clone(&ctx);
            let role = role.clone();
            let deadline = self.rooms.agent_timeout;

            join_set.spawn(async move {
                let result = tokio::time::timeout(deadline, agent.deliberate(&ctx)).await;
                (role, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((role, Ok(Ok(position)))) => {
                    debug!(%role, stance = %position.stance(), "position received");
                    positions.push(Self::normalized(position, &role, turn));
                }
                Ok((role, Ok(Err(e)))) => {
                    warn!(%role, error = %e, "agent invocation failed, recording abstain");
                    positions.push(
                        Position::abstain(role, format!("agent error: {e}"), turn),
                    );
                }
                Ok((role, Err(_elapsed))) => {
                    info!(%role, "agent missed deadline, recording abstain");
                    positions.push(Position::timed_out(role, turn));
                }
                Err(e) => {
                    warn!(error = %e, "agent task join error");
                }
            }
        }

        positions
    }

    /// Force the dispatched role and turn onto whatever the agent returned
    fn normalized(position: Position, role: &AgentRole, turn: u32) -> Position {
        if position.role() == role && position.turn() == turn {
            position
        } else {
            Position::new(role.clone(), position.stance(), position.rationale(), turn)
                .with_confidence(position.confidence())
        }
    }
}
