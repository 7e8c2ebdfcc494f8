//! Adapter implementations for tracker persistence and roster ports.

pub mod memory;
pub mod sqlite;

mod roster;

pub use roster::{JsonFileRosterSource, StaticRosterSource};
