//! Agent role value object

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Specialized deliberation roles that can sit on a room's roster (Value Object)
///
/// Each role maps to one stateless deliberator in the injected agent pool.
/// The `Moderator` additionally acts as the tie-breaking vote when a
/// deliberation ends in a near-tie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgentRole {
    Finance,
    ResearchAndDevelopment,
    Legal,
    Strategy,
    Moderator,
    /// A custom role outside the built-in specialist set
    Custom(String),
}

impl AgentRole {
    /// Get the string identifier for this role
    pub fn as_str(&self) -> &str {
        match self {
            AgentRole::Finance => "finance",
            AgentRole::ResearchAndDevelopment => "rnd",
            AgentRole::Legal => "legal",
            AgentRole::Strategy => "strategy",
            AgentRole::Moderator => "moderator",
            AgentRole::Custom(s) => s,
        }
    }

    /// The default roster of enabled roles for a newly created room
    pub fn default_roster() -> Vec<AgentRole> {
        vec![
            AgentRole::Finance,
            AgentRole::ResearchAndDevelopment,
            AgentRole::Legal,
            AgentRole::Strategy,
            AgentRole::Moderator,
        ]
    }

    /// Check if this role is the moderator
    pub fn is_moderator(&self) -> bool {
        matches!(self, AgentRole::Moderator)
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "finance" => Ok(AgentRole::Finance),
            "rnd" | "r&d" | "research" => Ok(AgentRole::ResearchAndDevelopment),
            "legal" => Ok(AgentRole::Legal),
            "strategy" => Ok(AgentRole::Strategy),
            "moderator" => Ok(AgentRole::Moderator),
            other if !other.trim().is_empty() => Ok(AgentRole::Custom(other.to_string())),
            _ => Err("Agent role cannot be empty".to_string()),
        }
    }
}

impl Serialize for AgentRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AgentRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
