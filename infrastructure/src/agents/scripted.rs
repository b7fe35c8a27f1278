//! Scripted deliberators for tests and harnesses
//!
//! Deterministic stand-ins for the specialist panel: fixed stances, forced
//! slowness, and guaranteed failures. Used by the integration tests and
//! useful to hosts writing their own.

use async_trait::async_trait;
use boardroom_application::ports::agent_pool::{AgentError, DeliberationContext, Deliberator};
use boardroom_domain::{AgentRole, Position, Stance};
use std::time::Duration;

/// Returns a fixed stance every turn, or a per-turn script
pub struct ScriptedDeliberator {
    role: AgentRole,
    /// Stance and confidence per turn; the last entry repeats
    script: Vec<(Stance, f64)>,
}

impl ScriptedDeliberator {
    /// Same stance and confidence on every turn
    pub fn fixed(role: AgentRole, stance: Stance, confidence: f64) -> Self {
        Self {
            role,
            script: vec![(stance, confidence)],
        }
    }

    /// One (stance, confidence) entry per turn; the last entry repeats
    ///
    /// # Panics
    /// Panics if the script is empty
    pub fn per_turn(role: AgentRole, script: Vec<(Stance, f64)>) -> Self {
        assert!(!script.is_empty(), "script cannot be empty");
        Self { role, script }
    }
}

#[async_trait]
impl Deliberator for ScriptedDeliberator {
    fn role(&self) -> AgentRole {
        self.role.clone()
    }

    async fn deliberate(&self, ctx: &DeliberationContext) -> Result<Position, AgentError> {
        let index = (ctx.turn as usize).saturating_sub(1).min(self.script.len() - 1);
        let (stance, confidence) = self.script[index];
        Ok(
            Position::new(self.role.clone(), stance, "scripted position", ctx.turn)
                .with_confidence(confidence),
        )
    }
}

/// Sleeps before answering; pair with a short agent timeout to exercise
/// the abstain-on-deadline path
pub struct SlowDeliberator {
    role: AgentRole,
    delay: Duration,
}

impl SlowDeliberator {
    pub fn new(role: AgentRole, delay: Duration) -> Self {
        Self { role, delay }
    }
}

#[async_trait]
impl Deliberator for SlowDeliberator {
    fn role(&self) -> AgentRole {
        self.role.clone()
    }

    async fn deliberate(&self, ctx: &DeliberationContext) -> Result<Position, AgentError> {
        tokio::time::sleep(self.delay).await;
        Ok(Position::support(self.role.clone(), "slow but supportive", ctx.turn)
            .with_confidence(0.9))
    }
}

/// Always fails with an invocation error
pub struct FailingDeliberator {
    role: AgentRole,
}

impl FailingDeliberator {
    pub fn new(role: AgentRole) -> Self {
        Self { role }
    }
}

#[async_trait]
impl Deliberator for FailingDeliberator {
    fn role(&self) -> AgentRole {
        self.role.clone()
    }

    async fn deliberate(&self, _ctx: &DeliberationContext) -> Result<Position, AgentError> {
        Err(AgentError::Invocation("scripted failure".to_string()))
    }
}
