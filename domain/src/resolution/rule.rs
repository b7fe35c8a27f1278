//! The resolution rule for deliberation turns
//!
//! The rule is a pure deterministic function: a fixed set of positions and
//! a fixed configuration always yield the same outcome.

use crate::core::error::DomainError;
use crate::deliberation::position::Stance;
use crate::resolution::tally::{PositionTally, ResolutionOutcome};
use serde::{Deserialize, Serialize};

/// Thresholds and bounds controlling turn resolution
///
/// # Example
///
/// ```
/// use boardroom_domain::{PositionTally, ResolutionRule, ResolutionOutcome};
///
/// let rule = ResolutionRule::default();
/// let tally = PositionTally::from_positions(&[]);
/// // An empty first turn resolves to another round, not a decision
/// assert_eq!(rule.decide(&tally, 1), ResolutionOutcome::Continue);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionRule {
    /// Weighted support score required to accept (and, symmetrically,
    /// weighted oppose score required to reject)
    pub support_threshold: f64,
    /// A single opposing (supporting) confidence at or above this blocks
    /// acceptance (rejection)
    pub veto_threshold: f64,
    /// Scores within this distance count as a tie at the final turn
    pub tie_epsilon: f64,
    /// Maximum number of turns before escalation
    pub max_turns: u32,
}

impl Default for ResolutionRule {
    fn default() -> Self {
        Self {
            support_threshold: 0.6,
            veto_threshold: 0.8,
            tie_epsilon: 0.05,
            max_turns: 3,
        }
    }
}

impl ResolutionRule {
    // ==================== Builder Methods ====================

    pub fn with_support_threshold(mut self, threshold: f64) -> Self {
        self.support_threshold = threshold;
        self
    }

    pub fn with_veto_threshold(mut self, threshold: f64) -> Self {
        self.veto_threshold = threshold;
        self
    }

    pub fn with_tie_epsilon(mut self, epsilon: f64) -> Self {
        self.tie_epsilon = epsilon;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Validate threshold ranges
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.support_threshold) || self.support_threshold == 0.0 {
            return Err(DomainError::InvalidRule(format!(
                "support_threshold must be in (0, 1], got {}",
                self.support_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.veto_threshold) || self.veto_threshold == 0.0 {
            return Err(DomainError::InvalidRule(format!(
                "veto_threshold must be in (0, 1], got {}",
                self.veto_threshold
            )));
        }
        if !(0.0..1.0).contains(&self.tie_epsilon) {
            return Err(DomainError::InvalidRule(format!(
                "tie_epsilon must be in [0, 1), got {}",
                self.tie_epsilon
            )));
        }
        if self.max_turns == 0 {
            return Err(DomainError::InvalidRule(
                "max_turns must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply the rule to one turn's tally
    ///
    /// - Accept when the weighted support score clears the threshold and no
    ///   single opposing confidence reaches the veto threshold; reject on
    ///   the symmetric condition.
    /// - Otherwise run another rebuttal round while turns remain.
    /// - At the final turn, a near-tie is decided by the moderator's stance
    ///   (support accepts, oppose rejects, anything else escalates); an
    ///   unresolved non-tie escalates.
    pub fn decide(&self, tally: &PositionTally, turn: u32) -> ResolutionOutcome {
        let accept = tally.support_score >= self.support_threshold
            && tally.max_oppose_confidence < self.veto_threshold;
        let reject = tally.oppose_score >= self.support_threshold
            && tally.max_support_confidence < self.veto_threshold;

        if accept {
            return ResolutionOutcome::Accepted;
        }
        if reject {
            return ResolutionOutcome::Rejected;
        }
        if turn < self.max_turns {
            return ResolutionOutcome::Continue;
        }
        if tally.is_near_tie(self.tie_epsilon) {
            return match tally.moderator_stance {
                Some(Stance::Support) => ResolutionOutcome::Accepted,
                Some(Stance::Oppose) => ResolutionOutcome::Rejected,
                _ => ResolutionOutcome::Escalated,
            };
        }
        ResolutionOutcome::Escalated
    }
}
