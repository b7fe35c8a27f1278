//! Configuration loading
//!
//! TOML file configuration with figment-based multi-source merging.

pub mod file_config;
pub mod loader;

pub use file_config::{
    FileCheckpointConfig, FileConfig, FileIntakeConfig, FileLockConfig, FileResolutionConfig,
    FileRoomsConfig,
};
pub use loader::ConfigLoader;
