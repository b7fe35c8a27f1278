//! Per-room deliberation state machine
//!
//! `DeliberationState` is the orchestrator's working memory. It is treated
//! as an immutable value: every transition consumes the current state and
//! returns the next one, which the caller commits atomically before acting
//! on it. There is exactly one live state per room, enforced by the room
//! lock coordinator.

use crate::core::error::DomainError;
use crate::deliberation::position::Position;
use crate::deliberation::proposal::{Proposal, ProposalStatus};
use crate::message::entities::RecordId;
use crate::room::entities::Room;
use crate::room::value_objects::RoomId;
use serde::{Deserialize, Serialize};

/// Phase of the deliberation state machine
///
/// Terminal proposal outcomes (`accepted`/`rejected`/`escalated`) live on
/// the proposal itself; once one is reached the room returns to `Idle` and
/// is eligible for the next incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliberationPhase {
    /// No active run; ready for the next message
    Idle,
    /// A proposal has been created for the current turn
    ProposalOpen,
    /// Agent fan-out in flight; waiting for every roster role
    CollectingPositions,
    /// All positions in; applying the resolution rule
    Resolving,
}

impl DeliberationPhase {
    pub fn as_str(&self) -> &str {
        match self {
            DeliberationPhase::Idle => "idle",
            DeliberationPhase::ProposalOpen => "proposal_open",
            DeliberationPhase::CollectingPositions => "collecting_positions",
            DeliberationPhase::Resolving => "resolving",
        }
    }
}

impl std::fmt::Display for DeliberationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The working memory of one room's deliberation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationState {
    room: Room,
    phase: DeliberationPhase,
    proposal: Option<Proposal>,
    turn: u32,
    last_record: Option<RecordId>,
}

impl DeliberationState {
    /// Fresh state for a room that has never deliberated
    pub fn new(room: Room) -> Self {
        Self {
            room,
            phase: DeliberationPhase::Idle,
            proposal: None,
            turn: 0,
            last_record: None,
        }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn room_id(&self) -> &RoomId {
        self.room.id()
    }

    pub fn phase(&self) -> DeliberationPhase {
        self.phase
    }

    pub fn proposal(&self) -> Option<&Proposal> {
        self.proposal.as_ref()
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn last_record(&self) -> Option<RecordId> {
        self.last_record
    }

    /// Idempotency check: has this state already absorbed the record?
    ///
    /// Record ids are monotonic per partition and records are processed in
    /// log order, so an ordering comparison suffices.
    pub fn has_processed(&self, record_id: RecordId) -> bool {
        self.last_record.is_some_and(|last| last >= record_id)
    }

    /// `Idle --newMessage--> ProposalOpen`
    pub fn open_proposal(
        mut self,
        proposal: Proposal,
        record_id: RecordId,
    ) -> Result<Self, DomainError> {
        if self.proposal.as_ref().is_some_and(|p| !p.is_terminal()) {
            return Err(DomainError::ProposalAlreadyResolved(
                self.proposal.as_ref().map(|p| p.id().to_string()).unwrap_or_default(),
            ));
        }
        self.proposal = Some(proposal);
        self.turn = 1;
        self.last_record = Some(record_id);
        self.phase = DeliberationPhase::ProposalOpen;
        Ok(self)
    }

    /// `ProposalOpen --dispatch--> CollectingPositions`
    pub fn begin_collecting(mut self) -> Self {
        self.phase = DeliberationPhase::CollectingPositions;
        self
    }

    /// Fan-in: fold the turn's positions into the proposal
    pub fn record_positions(mut self, positions: Vec<Position>) -> Result<Self, DomainError> {
        let proposal = self.proposal.as_mut().ok_or(DomainError::NoOpenProposal)?;
        for position in positions {
            proposal.record_position(position)?;
        }
        Ok(self)
    }

    /// `CollectingPositions --allResponded--> Resolving`
    pub fn begin_resolving(mut self) -> Self {
        self.phase = DeliberationPhase::Resolving;
        self
    }

    /// Loop back for a rebuttal round: revise the proposal from this turn's
    /// concerns and advance the turn counter
    pub fn next_turn(mut self) -> Result<Self, DomainError> {
        let turn = self.turn;
        let proposal = self.proposal.as_mut().ok_or(DomainError::NoOpenProposal)?;
        proposal.revise(turn);
        self.turn += 1;
        self.phase = DeliberationPhase::ProposalOpen;
        Ok(self)
    }

    /// Persist a terminal proposal status and return control to `Idle`
    pub fn conclude(mut self, status: ProposalStatus) -> Result<Self, DomainError> {
        let proposal = self.proposal.as_mut().ok_or(DomainError::NoOpenProposal)?;
        proposal.resolve(status)?;
        self.phase = DeliberationPhase::Idle;
        Ok(self)
    }

    /// Mark the room degraded after an unrecoverable persistence failure
    pub fn mark_degraded(mut self) -> Self {
        self.room.mark_degraded();
        self.phase = DeliberationPhase::Idle;
        self
    }

    /// Explicitly close the room
    pub fn close_room(mut self) -> Self {
        self.room.close();
        self
    }

    /// Return the same state with every rationale cut to `max_len` chars
    pub fn truncate_rationales(mut self, max_len: usize) -> Self {
        if let Some(proposal) = self.proposal.take() {
            let mut truncated =
                Proposal::new(proposal.id(), proposal.record_id(), proposal.text());
            let status = proposal.status();
            for position in proposal.positions() {
                // Positions were valid when first recorded; re-recording the
                // truncated copies cannot collide.
                let _ = truncated.record_position(position.clone().truncated(max_len));
            }
            if status.is_terminal() {
                let _ = truncated.resolve(status);
            }
            self.proposal = Some(truncated);
        }
        self
    }
}
