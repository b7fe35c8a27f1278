//! Infrastructure layer for boardroom
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, including configuration file loading.

pub mod agents;
pub mod checkpoint;
pub mod config;
pub mod lock;
pub mod log;
pub mod metrics;

// Re-export commonly used types
pub use agents::{
    panel::specialist_pool,
    scripted::{FailingDeliberator, ScriptedDeliberator, SlowDeliberator},
};
pub use checkpoint::{jsonl::JsonlCheckpointStore, memory::InMemoryCheckpointStore};
pub use config::{
    ConfigLoader, FileCheckpointConfig, FileConfig, FileIntakeConfig, FileLockConfig,
    FileResolutionConfig, FileRoomsConfig,
};
pub use lock::memory::InMemoryRoomLocks;
pub use log::memory::InMemoryMessageLog;
pub use metrics::tracing_sink::TracingMetricsSink;
