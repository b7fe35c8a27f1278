//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_pool;
pub mod checkpoint_store;
pub mod message_log;
pub mod metrics;
pub mod room_lock;
