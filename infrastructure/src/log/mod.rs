//! Message log adapters

pub mod memory;
