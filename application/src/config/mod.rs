//! Application configuration
//!
//! Parameter groups for the engine's moving parts, plus the
//! [`EngineConfig`] container the binary assembles from file config.

pub mod engine;
pub mod params;

pub use engine::EngineConfig;
pub use params::{CheckpointParams, IntakeParams, LockParams, RoomParams};
