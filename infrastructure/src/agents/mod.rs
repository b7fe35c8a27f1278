//! Agent pool implementations

pub mod panel;
pub mod scripted;

pub use panel::specialist_pool;
pub use scripted::{FailingDeliberator, ScriptedDeliberator, SlowDeliberator};
