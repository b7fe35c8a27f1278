//! Incoming message records

pub mod entities;

pub use entities::{IncomingMessage, RecordId};
