//! Engine configuration container
//!
//! Groups the parameter slices so the binary can hold one value and hand
//! each component only the slice it needs (honest type signatures).

use crate::config::params::{CheckpointParams, IntakeParams, LockParams, RoomParams};
use boardroom_domain::{DomainError, ResolutionRule};

/// Configuration container assembled at startup
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    rule: ResolutionRule,
    intake: IntakeParams,
    checkpoint: CheckpointParams,
    lock: LockParams,
    rooms: RoomParams,
}

impl EngineConfig {
    pub fn new(
        rule: ResolutionRule,
        intake: IntakeParams,
        checkpoint: CheckpointParams,
        lock: LockParams,
        rooms: RoomParams,
    ) -> Self {
        Self {
            rule,
            intake,
            checkpoint,
            lock,
            rooms,
        }
    }

    // ==================== Accessors ====================

    pub fn rule(&self) -> &ResolutionRule {
        &self.rule
    }

    pub fn intake(&self) -> &IntakeParams {
        &self.intake
    }

    pub fn checkpoint(&self) -> &CheckpointParams {
        &self.checkpoint
    }

    pub fn lock(&self) -> &LockParams {
        &self.lock
    }

    pub fn rooms(&self) -> &RoomParams {
        &self.rooms
    }

    // ==================== Builder Methods ====================

    pub fn with_rule(mut self, rule: ResolutionRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_intake(mut self, intake: IntakeParams) -> Self {
        self.intake = intake;
        self
    }

    pub fn with_checkpoint(mut self, checkpoint: CheckpointParams) -> Self {
        self.checkpoint = checkpoint;
        self
    }

    pub fn with_lock(mut self, lock: LockParams) -> Self {
        self.lock = lock;
        self
    }

    pub fn with_rooms(mut self, rooms: RoomParams) -> Self {
        self.rooms = rooms;
        self
    }

    /// Validate the combination
    pub fn validate(&self) -> Result<(), DomainError> {
        self.rule.validate()?;
        if self.rooms.roster.is_empty() {
            return Err(DomainError::EmptyRoster);
        }
        Ok(())
    }
}
