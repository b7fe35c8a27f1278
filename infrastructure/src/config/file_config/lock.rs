//! Lease configuration from TOML (`[lock]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [lock]
//! lease_ttl_ms = 30000
//! ```

use boardroom_application::config::LockParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Room lease bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLockConfig {
    /// Lease time-to-live
    pub lease_ttl_ms: u64,
}

impl Default for FileLockConfig {
    fn default() -> Self {
        Self {
            lease_ttl_ms: LockParams::default().lease_ttl.as_millis() as u64,
        }
    }
}

impl FileLockConfig {
    pub fn to_params(&self) -> LockParams {
        LockParams::default().with_lease_ttl(Duration::from_millis(self.lease_ttl_ms))
    }
}
