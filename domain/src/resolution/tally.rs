//! Weighted aggregation of one turn's positions
//!
//! A [`PositionTally`] reduces a turn to the numbers the resolution rule
//! needs. Confidence sums are normalized by the number of positions in the
//! turn, so abstentions dampen both sides without favoring either.

use crate::deliberation::position::{Position, Stance};
use serde::{Deserialize, Serialize};

/// Outcome of applying the resolution rule to one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionOutcome {
    /// Support carried the turn
    Accepted,
    /// Opposition carried the turn
    Rejected,
    /// No resolution yet; run another rebuttal round
    Continue,
    /// Turn budget exhausted without resolution; hand to a human
    Escalated,
}

impl ResolutionOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ResolutionOutcome::Continue)
    }
}

impl std::fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionOutcome::Accepted => write!(f, "accepted"),
            ResolutionOutcome::Rejected => write!(f, "rejected"),
            ResolutionOutcome::Continue => write!(f, "continue"),
            ResolutionOutcome::Escalated => write!(f, "escalated"),
        }
    }
}

/// Aggregated view of one turn's positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionTally {
    /// Sum of supporting confidences divided by the number of positions
    pub support_score: f64,
    /// Sum of opposing confidences divided by the number of positions
    pub oppose_score: f64,
    /// Strongest single supporting confidence
    pub max_support_confidence: f64,
    /// Strongest single opposing confidence
    pub max_oppose_confidence: f64,
    /// Number of abstain / request-more-info positions
    pub abstentions: usize,
    /// Total positions in the turn
    pub total: usize,
    /// The moderator's stance this turn, if a moderator responded
    pub moderator_stance: Option<Stance>,
}

impl PositionTally {
    /// Aggregate one turn's positions
    pub fn from_positions(positions: &[&Position]) -> Self {
        let total = positions.len();
        let mut support_sum = 0.0;
        let mut oppose_sum = 0.0;
        let mut max_support = 0.0f64;
        let mut max_oppose = 0.0f64;
        let mut abstentions = 0;
        let mut moderator_stance = None;

        for position in positions {
            match position.stance() {
                Stance::Support => {
                    support_sum += position.confidence();
                    max_support = max_support.max(position.confidence());
                }
                Stance::Oppose => {
                    oppose_sum += position.confidence();
                    max_oppose = max_oppose.max(position.confidence());
                }
                Stance::Abstain | Stance::RequestMoreInfo => abstentions += 1,
            }
            if position.role().is_moderator() {
                moderator_stance = Some(position.stance());
            }
        }

        let denominator = total.max(1) as f64;
        Self {
            support_score: support_sum / denominator,
            oppose_score: oppose_sum / denominator,
            max_support_confidence: max_support,
            max_oppose_confidence: max_oppose,
            abstentions,
            total,
            moderator_stance,
        }
    }

    /// Whether support and opposition are balanced within the given epsilon
    pub fn is_near_tie(&self, epsilon: f64) -> bool {
        (self.support_score - self.oppose_score).abs() <= epsilon
    }
}
