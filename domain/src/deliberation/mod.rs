//! Deliberation entities: positions, proposals, and the per-room state machine

pub mod position;
pub mod proposal;
pub mod state;

pub use position::{Position, Stance};
pub use proposal::{Proposal, ProposalStatus};
pub use state::{DeliberationPhase, DeliberationState};
