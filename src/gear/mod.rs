//! Gear system: slots, the floor/cost table, and acquisition sources.

pub mod slots;
pub mod sources;

pub use slots::*;
pub use sources::*;
