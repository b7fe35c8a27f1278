//! Agent pool port
//!
//! Defines the interface for the specialized deliberation participants.
//! Each deliberator is a stateless function from (room context, proposal)
//! to a position; the pool is an explicit, injected configuration passed
//! into the orchestrator's run context; there is no process-wide registry.

use async_trait::async_trait;
use boardroom_domain::{AgentRole, Position, RoomId};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during an agent invocation
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Agent invocation failed: {0}")]
    Invocation(String),

    #[error("Agent backend unavailable: {0}")]
    Unavailable(String),
}

/// Everything an agent sees when forming a position
#[derive(Debug, Clone)]
pub struct DeliberationContext {
    pub room_id: RoomId,
    pub proposal_text: String,
    pub turn: u32,
    /// Positions from earlier turns, for rebuttal rounds
    pub prior_positions: Vec<Position>,
}

impl DeliberationContext {
    pub fn new(room_id: RoomId, proposal_text: impl Into<String>, turn: u32) -> Self {
        Self {
            room_id,
            proposal_text: proposal_text.into(),
            turn,
            prior_positions: Vec::new(),
        }
    }

    pub fn with_prior_positions(mut self, positions: Vec<Position>) -> Self {
        self.prior_positions = positions;
        self
    }
}

/// A single deliberation participant
///
/// Implementations must be stateless with respect to rooms: all per-room
/// context arrives through the [`DeliberationContext`]. The returned
/// position's role and turn are normalized by the orchestrator.
#[async_trait]
pub trait Deliberator: Send + Sync {
    /// The roster role this deliberator fills
    fn role(&self) -> AgentRole;

    /// Form a position on the proposal for the current turn
    async fn deliberate(&self, ctx: &DeliberationContext) -> Result<Position, AgentError>;
}

/// Explicit, injected roster-to-implementation mapping
///
/// A `BTreeMap` keeps iteration order stable, which keeps dispatch order
/// (and therefore logs and tests) deterministic.
#[derive(Clone, Default)]
pub struct AgentPool {
    agents: BTreeMap<AgentRole, Arc<dyn Deliberator>>,
}

impl AgentPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the deliberator for its declared role
    pub fn with_agent(mut self, agent: Arc<dyn Deliberator>) -> Self {
        self.agents.insert(agent.role(), agent);
        self
    }

    pub fn get(&self, role: &AgentRole) -> Option<&Arc<dyn Deliberator>> {
        self.agents.get(role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &AgentRole> {
        self.agents.keys()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl std::fmt::Debug for AgentPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentPool")
            .field("roles", &self.agents.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardroom_domain::Stance;

    struct FixedAgent {
        role: AgentRole,
    }

    #[async_trait]
    impl Deliberator for FixedAgent {
        fn role(&self) -> AgentRole {
            self.role.clone()
        }

        async fn deliberate(&self, ctx: &DeliberationContext) -> Result<Position, AgentError> {
            Ok(Position::support(self.role.clone(), "Fine.", ctx.turn))
        }
    }

    #[tokio::test]
    async fn test_pool_lookup_and_dispatch() {
        let pool = AgentPool::new()
            .with_agent(Arc::new(FixedAgent {
                role: AgentRole::Finance,
            }))
            .with_agent(Arc::new(FixedAgent {
                role: AgentRole::Legal,
            }));

        assert_eq!(pool.len(), 2);
        assert!(pool.get(&AgentRole::Finance).is_some());
        assert!(pool.get(&AgentRole::Moderator).is_none());

        let ctx = DeliberationContext::new(RoomId::new("demo"), "Approve it", 1);
        let position = pool
            .get(&AgentRole::Legal)
            .unwrap()
            .deliberate(&ctx)
            .await
            .unwrap();
        assert_eq!(position.stance(), Stance::Support);
    }

    #[test]
    fn test_replacing_a_role() {
        let pool = AgentPool::new()
            .with_agent(Arc::new(FixedAgent {
                role: AgentRole::Finance,
            }))
            .with_agent(Arc::new(FixedAgent {
                role: AgentRole::Finance,
            }));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_context_builder() {
        let ctx = DeliberationContext::new(RoomId::new("demo"), "text", 2)
            .with_prior_positions(vec![Position::oppose(AgentRole::Legal, "No.", 1)]);
        assert_eq!(ctx.turn, 2);
        assert_eq!(ctx.prior_positions.len(), 1);
    }
}
