//! Room entity

use crate::agent::role::AgentRole;
use crate::core::error::DomainError;
use crate::room::value_objects::RoomId;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// Accepting messages and running deliberations
    Open,
    /// Explicitly closed; no further deliberations
    Closed,
    /// A run exhausted its persistence retry budget; needs operator attention
    Degraded,
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomStatus::Open => write!(f, "open"),
            RoomStatus::Closed => write!(f, "closed"),
            RoomStatus::Degraded => write!(f, "degraded"),
        }
    }
}

/// A boardroom deliberation context (Entity)
///
/// Created on first message for its id. Holds the roster of enabled agent
/// roles; the roster is fixed for the lifetime of the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    roster: Vec<AgentRole>,
    status: RoomStatus,
}

impl Room {
    /// Create a new open room with the given roster
    ///
    /// Duplicate roles are collapsed; an empty roster is rejected.
    pub fn new(id: RoomId, roster: Vec<AgentRole>) -> Result<Self, DomainError> {
        let mut deduped: Vec<AgentRole> = Vec::with_capacity(roster.len());
        for role in roster {
            if !deduped.contains(&role) {
                deduped.push(role);
            }
        }
        if deduped.is_empty() {
            return Err(DomainError::EmptyRoster);
        }
        Ok(Self {
            id,
            roster: deduped,
            status: RoomStatus::Open,
        })
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn roster(&self) -> &[AgentRole] {
        &self.roster
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    /// Check whether a role is enabled in this room
    pub fn has_role(&self, role: &AgentRole) -> bool {
        self.roster.contains(role)
    }

    /// Whether the room has a moderator to break ties
    pub fn has_moderator(&self) -> bool {
        self.roster.iter().any(|r| r.is_moderator())
    }

    pub fn is_open(&self) -> bool {
        self.status == RoomStatus::Open
    }

    /// Explicitly close the room
    pub fn close(&mut self) {
        self.status = RoomStatus::Closed;
    }

    /// Mark the room degraded after an unrecoverable persistence failure
    pub fn mark_degraded(&mut self) {
        self.status = RoomStatus::Degraded;
    }
}
