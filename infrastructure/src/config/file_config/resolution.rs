//! Resolution rule configuration from TOML (`[resolution]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [resolution]
//! support_threshold = 0.6
//! veto_threshold = 0.8
//! tie_epsilon = 0.05
//! max_turns = 3
//! ```

use boardroom_domain::ResolutionRule;
use serde::{Deserialize, Serialize};

/// Resolution thresholds and the turn budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResolutionConfig {
    /// Weighted support score required to accept
    pub support_threshold: f64,
    /// Single-position confidence that blocks the opposite outcome
    pub veto_threshold: f64,
    /// Score distance treated as a tie at the final turn
    pub tie_epsilon: f64,
    /// Rebuttal rounds before escalation
    pub max_turns: u32,
}

impl Default for FileResolutionConfig {
    fn default() -> Self {
        let rule = ResolutionRule::default();
        Self {
            support_threshold: rule.support_threshold,
            veto_threshold: rule.veto_threshold,
            tie_epsilon: rule.tie_epsilon,
            max_turns: rule.max_turns,
        }
    }
}

impl FileResolutionConfig {
    /// Build the domain rule (validated later by `EngineConfig::validate`)
    pub fn to_rule(&self) -> ResolutionRule {
        ResolutionRule::default()
            .with_support_threshold(self.support_threshold)
            .with_veto_threshold(self.veto_threshold)
            .with_tie_epsilon(self.tie_epsilon)
            .with_max_turns(self.max_turns)
    }
}
