//! Proposal entity
//!
//! The unit of deliberation: a claim under active debate by the agent
//! roster. Positions are append-only within a proposal's lifetime and the
//! status leaves `Open` at most once.

use crate::core::error::DomainError;
use crate::deliberation::position::Position;
use crate::message::entities::RecordId;
use serde::{Deserialize, Serialize};

/// Status of a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    /// Under active deliberation
    Open,
    /// Resolution rule fired in favor
    Accepted,
    /// Resolution rule fired against
    Rejected,
    /// No resolution within the turn budget; needs a human
    Escalated,
}

impl ProposalStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProposalStatus::Open)
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalStatus::Open => write!(f, "open"),
            ProposalStatus::Accepted => write!(f, "accepted"),
            ProposalStatus::Rejected => write!(f, "rejected"),
            ProposalStatus::Escalated => write!(f, "escalated"),
        }
    }
}

/// A claim under deliberation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    id: String,
    record_id: RecordId,
    text: String,
    status: ProposalStatus,
    positions: Vec<Position>,
}

impl Proposal {
    /// Create an open proposal from the originating message record
    pub fn new(id: impl Into<String>, record_id: RecordId, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            record_id,
            text: text.into(),
            status: ProposalStatus::Open,
            positions: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> ProposalStatus {
        self.status
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Record one agent's position
    ///
    /// Rejects a second position from the same role in the same turn, and
    /// any position once the proposal is terminal.
    pub fn record_position(&mut self, position: Position) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::ProposalAlreadyResolved(self.id.clone()));
        }
        let duplicate = self
            .positions
            .iter()
            .any(|p| p.role() == position.role() && p.turn() == position.turn());
        if duplicate {
            return Err(DomainError::DuplicatePosition {
                role: position.role().to_string(),
                turn: position.turn(),
            });
        }
        self.positions.push(position);
        Ok(())
    }

    /// Positions recorded for a specific turn, sorted by role for
    /// deterministic downstream aggregation
    pub fn positions_for_turn(&self, turn: u32) -> Vec<&Position> {
        let mut turn_positions: Vec<&Position> =
            self.positions.iter().filter(|p| p.turn() == turn).collect();
        turn_positions.sort_by(|a, b| a.role().as_str().cmp(b.role().as_str()));
        turn_positions
    }

    /// Move the proposal out of `Open` exactly once
    pub fn resolve(&mut self, status: ProposalStatus) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::ProposalAlreadyResolved(self.id.clone()));
        }
        self.status = status;
        Ok(())
    }

    /// Synthesize the next rebuttal round's text from the concerns raised in
    /// the given turn (oppose and request-more-info rationales)
    pub fn revise(&mut self, turn: u32) {
        let concerns: Vec<String> = self
            .positions_for_turn(turn)
            .iter()
            .filter(|p| !p.is_support() && !p.rationale().is_empty())
            .map(|p| format!("- {}: {}", p.role(), p.rationale()))
            .collect();

        if !concerns.is_empty() {
            self.text = format!(
                "{}\n\nConcerns raised in round {}:\n{}",
                self.text,
                turn,
                concerns.join("\n")
            );
        }
    }
}
