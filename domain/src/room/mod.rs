//! Room entity and identifiers

pub mod entities;
pub mod value_objects;

pub use entities::{Room, RoomStatus};
pub use value_objects::{Author, RoomId};
