//! Resolution rules for deliberation outcomes

pub mod rule;
pub mod tally;

pub use rule::ResolutionRule;
pub use tally::{PositionTally, ResolutionOutcome};
