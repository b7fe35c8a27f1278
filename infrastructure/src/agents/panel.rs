//! Built-in specialist panel
//!
//! Deterministic, keyword-driven deliberators for the five default roles.
//! Each is a stateless function of the deliberation context: the same
//! proposal text and prior positions always produce the same position,
//! which keeps deliberations reproducible end to end.

use async_trait::async_trait;
use boardroom_application::ports::agent_pool::{
    AgentError, AgentPool, DeliberationContext, Deliberator,
};
use boardroom_domain::{AgentRole, Position, Stance};
use std::sync::Arc;

/// A specialist that reads the proposal through its domain's keywords
///
/// Favor hits push toward support, concern hits toward opposition;
/// conflicting signals turn into a request for more information.
pub struct SpecialistDeliberator {
    role: AgentRole,
    favor: &'static [&'static str],
    concern: &'static [&'static str],
    perspective: &'static str,
}

impl SpecialistDeliberator {
    pub fn finance() -> Self {
        Self {
            role: AgentRole::Finance,
            favor: &["budget", "approve", "invest", "funding", "revenue", "savings"],
            concern: &["deficit", "unfunded", "overrun", "freeze", "write-off"],
            perspective: "finance",
        }
    }

    pub fn research() -> Self {
        Self {
            role: AgentRole::ResearchAndDevelopment,
            favor: &["research", "prototype", "innovation", "develop", "experiment"],
            concern: &["cancel research", "cut r&d", "outsource engineering"],
            perspective: "R&D",
        }
    }

    pub fn legal() -> Self {
        Self {
            role: AgentRole::Legal,
            favor: &["compliant", "reviewed by counsel", "policy"],
            concern: &["breach", "lawsuit", "litigation", "non-compliant", "penalty", "skip legal"],
            perspective: "legal",
        }
    }

    pub fn strategy() -> Self {
        Self {
            role: AgentRole::Strategy,
            favor: &["increase", "growth", "expand", "market", "partnership"],
            concern: &["divest", "retreat", "downsize", "exit the market"],
            perspective: "strategy",
        }
    }

    fn hits(text: &str, words: &[&'static str]) -> Vec<&'static str> {
        words.iter().filter(|w| text.contains(**w)).copied().collect()
    }
}

#[async_trait]
impl Deliberator for SpecialistDeliberator {
    fn role(&self) -> AgentRole {
        self.role.clone()
    }

    async fn deliberate(&self, ctx: &DeliberationContext) -> Result<Position, AgentError> {
        let text = ctx.proposal_text.to_lowercase();
        let favor = Self::hits(&text, self.favor);
        let concern = Self::hits(&text, self.concern);

        let position = if concern.len() > favor.len() {
            let confidence = (0.55 + 0.1 * concern.len() as f64).min(0.95);
            Position::oppose(
                self.role.clone(),
                format!(
                    "Raises {} exposure: {}.",
                    self.perspective,
                    concern.join(", ")
                ),
                ctx.turn,
            )
            .with_confidence(confidence)
        } else if favor.len() > concern.len() {
            let confidence = (0.6 + 0.1 * favor.len() as f64).min(0.95);
            Position::support(
                self.role.clone(),
                format!(
                    "Sound from the {} side: {}.",
                    self.perspective,
                    favor.join(", ")
                ),
                ctx.turn,
            )
            .with_confidence(confidence)
        } else if !favor.is_empty() {
            // Equal favorable and concerning signals
            Position::new(
                self.role.clone(),
                Stance::RequestMoreInfo,
                format!(
                    "Conflicting {} signals; need specifics on: {}.",
                    self.perspective,
                    concern.join(", ")
                ),
                ctx.turn,
            )
            .with_confidence(0.4)
        } else {
            Position::support(
                self.role.clone(),
                format!("No objection from the {} perspective.", self.perspective),
                ctx.turn,
            )
            .with_confidence(0.65)
        };

        Ok(position)
    }
}

/// The facilitator: reserves judgment in the opening round, then sides
/// with the majority stance of the latest completed round
pub struct ModeratorDeliberator;

#[async_trait]
impl Deliberator for ModeratorDeliberator {
    fn role(&self) -> AgentRole {
        AgentRole::Moderator
    }

    async fn deliberate(&self, ctx: &DeliberationContext) -> Result<Position, AgentError> {
        let prior_turn = ctx.turn.saturating_sub(1);
        if prior_turn == 0 {
            return Ok(Position::abstain(
                AgentRole::Moderator,
                "Opening round; reserving judgment.",
                ctx.turn,
            ));
        }

        let (support, oppose) = ctx
            .prior_positions
            .iter()
            .filter(|p| p.turn() == prior_turn && !p.role().is_moderator())
            .fold((0usize, 0usize), |(s, o), p| match p.stance() {
                Stance::Support => (s + 1, o),
                Stance::Oppose => (s, o + 1),
                _ => (s, o),
            });

        let position = match support.cmp(&oppose) {
            std::cmp::Ordering::Greater => Position::support(
                AgentRole::Moderator,
                format!("Prior round favored the proposal {support} to {oppose}."),
                ctx.turn,
            )
            .with_confidence(0.75),
            std::cmp::Ordering::Less => Position::oppose(
                AgentRole::Moderator,
                format!("Prior round opposed the proposal {oppose} to {support}."),
                ctx.turn,
            )
            .with_confidence(0.75),
            std::cmp::Ordering::Equal => Position::abstain(
                AgentRole::Moderator,
                "Prior round was balanced; no casting signal yet.",
                ctx.turn,
            ),
        };
        Ok(position)
    }
}

/// The full built-in panel, one deliberator per default roster role
pub fn specialist_pool() -> AgentPool {
    AgentPool::new()
        .with_agent(Arc::new(SpecialistDeliberator::finance()))
        .with_agent(Arc::new(SpecialistDeliberator::research()))
        .with_agent(Arc::new(SpecialistDeliberator::legal()))
        .with_agent(Arc::new(SpecialistDeliberator::strategy()))
        .with_agent(Arc::new(ModeratorDeliberator))
}
