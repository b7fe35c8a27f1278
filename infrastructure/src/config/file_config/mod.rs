//! TOML file configuration
//!
//! All sections are optional; missing keys fall back to the built-in
//! defaults, so an empty `boardroom.toml` is valid.

pub mod checkpoint;
pub mod intake;
pub mod lock;
pub mod resolution;
pub mod rooms;

pub use checkpoint::FileCheckpointConfig;
pub use intake::FileIntakeConfig;
pub use lock::FileLockConfig;
pub use resolution::FileResolutionConfig;
pub use rooms::FileRoomsConfig;

use boardroom_application::config::EngineConfig;
use boardroom_domain::DomainError;
use serde::{Deserialize, Serialize};

/// Root configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub resolution: FileResolutionConfig,
    pub intake: FileIntakeConfig,
    pub checkpoint: FileCheckpointConfig,
    pub lock: FileLockConfig,
    pub rooms: FileRoomsConfig,
}

impl FileConfig {
    /// Convert into the application-layer configuration, validating the
    /// combination
    pub fn to_engine_config(&self) -> Result<EngineConfig, DomainError> {
        let config = EngineConfig::new(
            self.resolution.to_rule(),
            self.intake.to_params(),
            self.checkpoint.to_params(),
            self.lock.to_params(),
            self.rooms.to_params()?,
        );
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_valid() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.to_engine_config().is_ok());
    }

    #[test]
    fn test_full_round_trip() {
        let toml_str = r#"
[resolution]
support_threshold = 0.7
veto_threshold = 0.9
tie_epsilon = 0.02
max_turns = 5

[intake]
group = "boardroom-prod"
batch_size = 32
max_attempts = 3
pending_min_idle_ms = 60000

[checkpoint]
max_snapshot_bytes = 20480
max_rationale_len = 256
retain_last = 16
commit_attempts = 6

[lock]
lease_ttl_ms = 15000

[rooms]
roster = ["finance", "legal", "moderator"]
agent_timeout_ms = 5000
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let engine = config.to_engine_config().unwrap();

        assert_eq!(engine.rule().support_threshold, 0.7);
        assert_eq!(engine.rule().max_turns, 5);
        assert_eq!(engine.intake().group, "boardroom-prod");
        assert_eq!(engine.intake().batch_size, 32);
        assert_eq!(engine.checkpoint().retain_last, 16);
        assert_eq!(engine.lock().lease_ttl.as_millis(), 15000);
        assert_eq!(engine.rooms().roster.len(), 3);
        assert_eq!(engine.rooms().agent_timeout.as_millis(), 5000);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let toml_str = r#"
[resolution]
support_threshold = 1.5
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.to_engine_config().is_err());
    }
}
