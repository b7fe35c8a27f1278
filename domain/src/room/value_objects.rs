//! Room value objects

use serde::{Deserialize, Serialize};

/// Identifier of a boardroom deliberation context (Value Object)
///
/// A room holds at most one live deliberation at a time; all ordering
/// guarantees are scoped to a single room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId {
    id: String,
}

impl RoomId {
    /// Create a new room id
    ///
    /// # Panics
    /// Panics if the id is empty or only whitespace
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        assert!(!id.trim().is_empty(), "Room id cannot be empty");
        Self { id }
    }

    /// Try to create a new room id, returning None if invalid
    pub fn try_new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() { None } else { Some(Self { id }) }
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        RoomId::new(s)
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        RoomId::new(s)
    }
}

/// Verified author of an incoming message (Value Object)
///
/// The identity is supplied by the authentication layer upstream; the
/// engine treats it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Author {
    name: String,
}

impl Author {
    /// Create a new author
    ///
    /// # Panics
    /// Panics if the name is empty or only whitespace
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.trim().is_empty(), "Author cannot be empty");
        Self { name }
    }

    /// Try to create a new author, returning None if invalid
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            None
        } else {
            Some(Self { name })
        }
    }

    /// Get the author name as a string slice
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for Author {
    fn from(s: &str) -> Self {
        Author::new(s)
    }
}
