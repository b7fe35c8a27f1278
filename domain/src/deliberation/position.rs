//! Position types for boardroom deliberation
//!
//! This module defines the core voting primitives used when a room's agent
//! roster debates a proposal.

use crate::agent::role::AgentRole;
use serde::{Deserialize, Serialize};

/// Rationale recorded when an agent misses its response deadline
pub const TIMEOUT_RATIONALE: &str = "no response within deadline";

/// An agent's stance on a proposal for one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stance {
    Support,
    Oppose,
    Abstain,
    RequestMoreInfo,
}

impl Stance {
    pub fn as_str(&self) -> &str {
        match self {
            Stance::Support => "support",
            Stance::Oppose => "oppose",
            Stance::Abstain => "abstain",
            Stance::RequestMoreInfo => "request-more-info",
        }
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single agent's position on a proposal for a given turn
///
/// # Example
///
/// ```
/// use boardroom_domain::{AgentRole, Position, Stance};
///
/// let position = Position::support(AgentRole::Finance, "Fits the Q3 envelope.", 1)
///     .with_confidence(0.8);
/// assert_eq!(position.stance(), Stance::Support);
/// assert_eq!(position.confidence(), 0.8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    role: AgentRole,
    stance: Stance,
    /// Confidence in the stance, clamped to [0.0, 1.0]
    confidence: f64,
    rationale: String,
    turn: u32,
}

impl Position {
    /// Create a new position
    pub fn new(
        role: AgentRole,
        stance: Stance,
        rationale: impl Into<String>,
        turn: u32,
    ) -> Self {
        Self {
            role,
            stance,
            confidence: 0.5,
            rationale: rationale.into(),
            turn,
        }
    }

    /// Create a supporting position
    pub fn support(role: AgentRole, rationale: impl Into<String>, turn: u32) -> Self {
        Self::new(role, Stance::Support, rationale, turn)
    }

    /// Create an opposing position
    pub fn oppose(role: AgentRole, rationale: impl Into<String>, turn: u32) -> Self {
        Self::new(role, Stance::Oppose, rationale, turn)
    }

    /// Create an abstention
    pub fn abstain(role: AgentRole, rationale: impl Into<String>, turn: u32) -> Self {
        Self::new(role, Stance::Abstain, rationale, turn).with_confidence(0.0)
    }

    /// The default position for an agent that missed its deadline
    pub fn timed_out(role: AgentRole, turn: u32) -> Self {
        Self::abstain(role, TIMEOUT_RATIONALE, turn)
    }

    /// Set the confidence level, clamped to [0.0, 1.0]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn role(&self) -> &AgentRole {
        &self.role
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_support(&self) -> bool {
        self.stance == Stance::Support
    }

    pub fn is_oppose(&self) -> bool {
        self.stance == Stance::Oppose
    }

    /// Return the same position with the rationale cut to at most `max_len`
    /// characters (on a char boundary)
    pub fn truncated(mut self, max_len: usize) -> Self {
        if self.rationale.chars().count() > max_len {
            self.rationale = self.rationale.chars().take(max_len).collect();
        }
        self
    }
}
