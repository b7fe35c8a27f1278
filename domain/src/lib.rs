//! Domain layer for boardroom
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Deliberation
//!
//! A boardroom **Room** hosts one live deliberation at a time. An incoming
//! message opens a **Proposal**; the enabled agent roster debates it over
//! bounded **turns**, each agent contributing one **Position** per turn.
//!
//! ## Resolution
//!
//! After every turn the pure resolution rule tallies weighted positions and
//! decides whether the proposal is accepted, rejected, sent into another
//! rebuttal round, or escalated to a human.

pub mod agent;
pub mod checkpoint;
pub mod core;
pub mod deliberation;
pub mod message;
pub mod resolution;
pub mod room;
pub mod util;

// Re-export commonly used types
pub use agent::role::AgentRole;
pub use checkpoint::Checkpoint;
pub use crate::core::error::DomainError;
pub use deliberation::{
    position::{Position, Stance},
    proposal::{Proposal, ProposalStatus},
    state::{DeliberationPhase, DeliberationState},
};
pub use message::entities::{IncomingMessage, RecordId};
pub use resolution::{
    rule::ResolutionRule,
    tally::{PositionTally, ResolutionOutcome},
};
pub use room::{
    entities::{Room, RoomStatus},
    value_objects::{Author, RoomId},
};
