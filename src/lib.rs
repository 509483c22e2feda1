//! Raidplan - Raid Loot Distribution Planner Library
//!
//! Given a team's current gear state and banked clear books, computes a
//! week-by-week plan that allocates floor drops and book purchases until
//! every tracked job is fully equipped.

pub mod build_info;
pub mod constants;
pub mod gear;
pub mod planner;
pub mod team;

pub use planner::{calculate_distribution, DistributionPlan};
pub use team::RaidTeam;
