//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No agent roles enabled for room")]
    EmptyRoster,

    #[error("Invalid room id: {0}")]
    InvalidRoomId(String),

    #[error("Agent {role} already holds a position for turn {turn}")]
    DuplicatePosition { role: String, turn: u32 },

    #[error("Proposal {0} already reached a terminal status")]
    ProposalAlreadyResolved(String),

    #[error("No open proposal for this transition")]
    NoOpenProposal,

    #[error("Invalid resolution rule: {0}")]
    InvalidRule(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
