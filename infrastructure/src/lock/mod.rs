//! Room lock adapters

pub mod memory;
