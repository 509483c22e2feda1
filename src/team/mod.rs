//! Team roster snapshot types (the planner's external input).

pub mod types;

pub use types::*;
