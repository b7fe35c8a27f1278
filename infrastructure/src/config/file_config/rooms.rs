//! Room defaults from TOML (`[rooms]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [rooms]
//! roster = ["finance", "rnd", "legal", "strategy", "moderator"]
//! agent_timeout_ms = 15000
//! ```

use boardroom_application::config::RoomParams;
use boardroom_domain::{AgentRole, DomainError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Roster and per-agent deadline for newly created rooms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoomsConfig {
    /// Role names; unknown names become custom roles
    pub roster: Vec<String>,
    /// Deadline for each agent invocation
    pub agent_timeout_ms: u64,
}

impl Default for FileRoomsConfig {
    fn default() -> Self {
        let params = RoomParams::default();
        Self {
            roster: params.roster.iter().map(|r| r.as_str().to_string()).collect(),
            agent_timeout_ms: params.agent_timeout.as_millis() as u64,
        }
    }
}

impl FileRoomsConfig {
    pub fn to_params(&self) -> Result<RoomParams, DomainError> {
        let mut roster = Vec::with_capacity(self.roster.len());
        for name in &self.roster {
            let role: AgentRole = name
                .parse()
                .map_err(|_| DomainError::EmptyRoster)?;
            roster.push(role);
        }
        if roster.is_empty() {
            return Err(DomainError::EmptyRoster);
        }
        Ok(RoomParams::default()
            .with_roster(roster)
            .with_agent_timeout(Duration::from_millis(self.agent_timeout_ms)))
    }
}
